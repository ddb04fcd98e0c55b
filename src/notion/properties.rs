use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::types::RichText;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateValue {
    pub start: String,
}

/// A typed database property value, serialized in the API's
/// `{"<type>": <payload>}` shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyValue {
    Title(Vec<RichText>),
    RichText(Vec<RichText>),
    Date(DateValue),
    MultiSelect(Vec<SelectOption>),
    Number(f64),
}

impl PropertyValue {
    #[must_use]
    pub fn title(content: impl Into<String>) -> Self {
        Self::Title(vec![RichText::plain(content)])
    }

    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self::RichText(vec![RichText::plain(content)])
    }

    /// Rich text whose entire content links to `url`.
    #[must_use]
    pub fn linked_text(content: impl Into<String>, url: impl Into<String>) -> Self {
        Self::RichText(vec![RichText::linked(content, url)])
    }

    #[must_use]
    pub fn date(start: impl Into<String>) -> Self {
        Self::Date(DateValue {
            start: start.into(),
        })
    }

    /// One select option per label, in order.
    #[must_use]
    pub fn multi_select<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::MultiSelect(
            labels
                .into_iter()
                .map(|name| SelectOption { name: name.into() })
                .collect(),
        )
    }
}

/// Ordered page properties.
///
/// Values are only ever extended by producing a new `Properties`, so a
/// base set handed out once is never changed behind the holder's back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Properties(IndexMap<String, PropertyValue>);

impl Properties {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a copy with `name` set to `value`, replacing any previous value.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: PropertyValue) -> Self {
        self.0.insert(name.into(), value);
        self
    }

    /// Return the union of both sets; entries of `other` win on conflict.
    #[must_use]
    pub fn merged(&self, other: Properties) -> Self {
        let mut map = self.0.clone();
        map.extend(other.0);
        Self(map)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.0.get(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}
