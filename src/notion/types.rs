//! Notion objects and their wire representation.
//!
//! Outgoing objects serialize to the shape the create endpoints accept;
//! incoming objects are read from list/query responses. Only the block
//! kinds the mapping engine understands get their own variant, everything
//! else lands in [`BlockKind::Unsupported`] with its type name kept for
//! diagnostics.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{json, Map, Value};

/// Formatting attached to a rich-text run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Annotations {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub underline: bool,
    pub code: bool,
    pub color: String,
}

impl Default for Annotations {
    fn default() -> Self {
        Self {
            bold: false,
            italic: false,
            strikethrough: false,
            underline: false,
            code: false,
            color: "default".to_string(),
        }
    }
}

/// One run of rich text: literal content plus optional link and formatting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RichTextWire", into = "RichTextOut")]
pub struct RichText {
    pub plain_text: String,
    pub link: Option<String>,
    pub annotations: Option<Annotations>,
}

impl RichText {
    #[must_use]
    pub fn plain(content: impl Into<String>) -> Self {
        Self {
            plain_text: content.into(),
            link: None,
            annotations: None,
        }
    }

    /// A run whose whole content links to `url`.
    #[must_use]
    pub fn linked(content: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            plain_text: content.into(),
            link: Some(url.into()),
            annotations: None,
        }
    }
}

/// Concatenate the plain text of a run sequence.
#[must_use]
pub fn concat_plain_text(runs: &[RichText]) -> String {
    runs.iter().map(|r| r.plain_text.as_str()).collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TextWire {
    content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    link: Option<LinkWire>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LinkWire {
    url: String,
}

/// Rich text as returned by the API. Mentions and equations carry no
/// `text` object but always have `plain_text`.
#[derive(Debug, Deserialize)]
struct RichTextWire {
    #[serde(default)]
    plain_text: Option<String>,
    #[serde(default)]
    text: Option<TextWire>,
    #[serde(default)]
    href: Option<String>,
    #[serde(default)]
    annotations: Option<Annotations>,
}

impl From<RichTextWire> for RichText {
    fn from(wire: RichTextWire) -> Self {
        let text_link = wire
            .text
            .as_ref()
            .and_then(|t| t.link.as_ref())
            .map(|l| l.url.clone());
        let plain_text = wire
            .plain_text
            .or_else(|| wire.text.map(|t| t.content))
            .unwrap_or_default();
        Self {
            plain_text,
            link: text_link.or(wire.href),
            annotations: wire.annotations,
        }
    }
}

#[derive(Debug, Serialize)]
struct RichTextOut {
    #[serde(rename = "type")]
    kind: &'static str,
    text: TextWire,
    #[serde(skip_serializing_if = "Option::is_none")]
    annotations: Option<Annotations>,
    #[serde(skip_serializing_if = "Option::is_none")]
    href: Option<String>,
}

impl From<RichText> for RichTextOut {
    fn from(rt: RichText) -> Self {
        Self {
            kind: "text",
            text: TextWire {
                content: rt.plain_text,
                link: rt.link.clone().map(|url| LinkWire { url }),
            },
            annotations: rt.annotations,
            href: rt.link,
        }
    }
}

/// Block payload, one variant per understood block type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockKind {
    Paragraph(Vec<RichText>),
    BulletedListItem(Vec<RichText>),
    Heading2(Vec<RichText>),
    Embed {
        url: String,
    },
    /// Rows are child blocks and are never returned inline.
    Table {
        width: usize,
        has_column_header: bool,
        has_row_header: bool,
    },
    /// Each cell is its own run sequence.
    TableRow {
        cells: Vec<Vec<RichText>>,
    },
    Unsupported {
        type_name: String,
    },
}

impl BlockKind {
    /// The API's type tag for this kind.
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            Self::Paragraph(_) => "paragraph",
            Self::BulletedListItem(_) => "bulleted_list_item",
            Self::Heading2(_) => "heading_2",
            Self::Embed { .. } => "embed",
            Self::Table { .. } => "table",
            Self::TableRow { .. } => "table_row",
            Self::Unsupported { type_name } => type_name,
        }
    }
}

/// A node of a page's content tree.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawBlock")]
pub struct Block {
    /// Assigned by the API; `None` for blocks built locally.
    pub id: Option<String>,
    pub has_children: bool,
    pub kind: BlockKind,
}

impl Block {
    #[must_use]
    pub fn new(kind: BlockKind) -> Self {
        Self {
            id: None,
            has_children: false,
            kind,
        }
    }

    /// A paragraph holding a single unformatted run.
    #[must_use]
    pub fn paragraph(content: impl Into<String>) -> Self {
        Self::new(BlockKind::Paragraph(vec![RichText::plain(content)]))
    }

    #[must_use]
    pub fn embed(url: impl Into<String>) -> Self {
        Self::new(BlockKind::Embed { url: url.into() })
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Plain text of a text-bearing block, `None` for other kinds.
    #[must_use]
    pub fn text(&self) -> Option<String> {
        match &self.kind {
            BlockKind::Paragraph(runs)
            | BlockKind::BulletedListItem(runs)
            | BlockKind::Heading2(runs) => Some(concat_plain_text(runs)),
            _ => None,
        }
    }

    fn body(&self) -> Value {
        match &self.kind {
            BlockKind::Paragraph(runs)
            | BlockKind::BulletedListItem(runs)
            | BlockKind::Heading2(runs) => json!({ "rich_text": runs }),
            BlockKind::Embed { url } => json!({ "url": url }),
            BlockKind::Table {
                width,
                has_column_header,
                has_row_header,
            } => json!({
                "table_width": width,
                "has_column_header": has_column_header,
                "has_row_header": has_row_header,
            }),
            BlockKind::TableRow { cells } => json!({ "cells": cells }),
            BlockKind::Unsupported { .. } => json!({}),
        }
    }
}

impl Serialize for Block {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let type_name = self.kind.type_name();
        let mut obj = Map::new();
        obj.insert("object".to_string(), json!("block"));
        if let Some(id) = &self.id {
            obj.insert("id".to_string(), json!(id));
        }
        obj.insert("type".to_string(), json!(type_name));
        obj.insert(type_name.to_string(), self.body());
        Value::Object(obj).serialize(serializer)
    }
}

/// Block as returned by the API: a type tag plus a payload keyed by that tag.
#[derive(Debug, Deserialize)]
struct RawBlock {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    has_children: bool,
    #[serde(rename = "type")]
    type_name: String,
    #[serde(flatten)]
    rest: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct TextBody {
    #[serde(default)]
    rich_text: Vec<RichText>,
}

#[derive(Debug, Deserialize)]
struct EmbedBody {
    #[serde(default)]
    url: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TableBody {
    table_width: usize,
    has_column_header: bool,
    has_row_header: bool,
}

#[derive(Debug, Deserialize)]
struct TableRowBody {
    #[serde(default)]
    cells: Vec<Vec<RichText>>,
}

impl TryFrom<RawBlock> for Block {
    type Error = serde_json::Error;

    fn try_from(mut raw: RawBlock) -> Result<Self, Self::Error> {
        let body = raw.rest.remove(&raw.type_name).unwrap_or(Value::Null);
        let kind = match raw.type_name.as_str() {
            "paragraph" => BlockKind::Paragraph(serde_json::from_value::<TextBody>(body)?.rich_text),
            "bulleted_list_item" => {
                BlockKind::BulletedListItem(serde_json::from_value::<TextBody>(body)?.rich_text)
            }
            "heading_2" => BlockKind::Heading2(serde_json::from_value::<TextBody>(body)?.rich_text),
            "embed" => BlockKind::Embed {
                url: serde_json::from_value::<EmbedBody>(body)?.url,
            },
            "table" => {
                let table: TableBody = serde_json::from_value(body)?;
                BlockKind::Table {
                    width: table.table_width,
                    has_column_header: table.has_column_header,
                    has_row_header: table.has_row_header,
                }
            }
            "table_row" => BlockKind::TableRow {
                cells: serde_json::from_value::<TableRowBody>(body)?.cells,
            },
            _ => BlockKind::Unsupported {
                type_name: raw.type_name.clone(),
            },
        };
        Ok(Self {
            id: raw.id,
            has_children: raw.has_children,
            kind,
        })
    }
}

/// One page of a cursor-paginated list response.
#[derive(Debug, Deserialize)]
pub struct ListResponse<T> {
    pub results: Vec<T>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// A page row returned by a database query.
#[derive(Debug, Clone, Deserialize)]
pub struct PageSummary {
    pub id: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub created_time: String,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

impl PageSummary {
    /// Concatenated plain text of a title property.
    #[must_use]
    pub fn title(&self, property: &str) -> String {
        self.runs(property, "title")
    }

    /// Concatenated plain text of a rich-text property; empty when absent.
    #[must_use]
    pub fn rich_text(&self, property: &str) -> String {
        self.runs(property, "rich_text")
    }

    /// Start of a date property.
    #[must_use]
    pub fn date_start(&self, property: &str) -> Option<String> {
        self.properties
            .get(property)?
            .get("date")?
            .get("start")?
            .as_str()
            .map(String::from)
    }

    fn runs(&self, property: &str, field: &str) -> String {
        self.properties
            .get(property)
            .and_then(|p| p.get(field))
            .and_then(|v| serde_json::from_value::<Vec<RichText>>(v.clone()).ok())
            .map(|runs| concat_plain_text(&runs))
            .unwrap_or_default()
    }
}

/// Handle of a newly created page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PageHandle {
    pub id: String,
    #[serde(default)]
    pub url: String,
}

/// Handle of a newly created comment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommentHandle {
    pub id: String,
    #[serde(default)]
    pub discussion_id: Option<String>,
}

/// Character range `[start, end)` a comment is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CommentRange {
    pub start: usize,
    pub end: usize,
}
