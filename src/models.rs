//! Data models for the news feed.
//!
//! This module defines the records exchanged between the news adapter and the
//! view layer:
//! - [`Category`]: The closed set of topics, plus the `ALL` filter sentinel
//! - [`Article`]: One normalized story as returned by the model
//! - [`FetchResult`]: An ordered, never-empty batch of articles
//!
//! The article fields use camelCase names to match the JSON schema the model
//! is instructed to emit, hence the `#[allow(non_snake_case)]` attributes.

use crate::error::Error;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// A news topic, or the `ALL` sentinel meaning "no filter".
///
/// `ALL` only ever appears as a navigation value. Articles always carry one of
/// the four concrete topics; see [`Category::is_concrete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    #[default]
    All,
    Rockets,
    Astronomy,
    Tech,
    Future,
}

impl Category {
    /// Every value in navigation order.
    pub const VALUES: [Category; 5] = [
        Category::All,
        Category::Rockets,
        Category::Astronomy,
        Category::Tech,
        Category::Future,
    ];

    /// The four topics an article may carry.
    pub const CONCRETE: [Category; 4] = [
        Category::Rockets,
        Category::Astronomy,
        Category::Tech,
        Category::Future,
    ];

    /// Wire name, as sent to and received from the model.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::All => "ALL",
            Category::Rockets => "ROCKETS",
            Category::Astronomy => "ASTRONOMY",
            Category::Tech => "TECH",
            Category::Future => "FUTURE",
        }
    }

    /// Localized navigation label.
    pub fn label(&self) -> &'static str {
        match self {
            Category::All => "すべて",
            Category::Rockets => "ロケット",
            Category::Astronomy => "天文学",
            Category::Tech => "技術",
            Category::Future => "未来",
        }
    }

    pub fn is_concrete(&self) -> bool {
        !matches!(self, Category::All)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    /// Case-insensitive parse of the wire name (`rockets`, `ROCKETS`, ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::VALUES
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::InvalidCategory(wanted.to_string()))
    }
}

/// A single news story, normalized from the model's reply.
///
/// # JSON Schema
///
/// Field names follow the schema embedded in the prompt. `category` must be
/// one of the concrete topics, matched case-insensitively; an article tagged
/// `ALL` (or anything unknown) makes the whole reply unusable.
#[allow(non_snake_case)]
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Article {
    /// Identifier, expected unique within one batch.
    pub id: String,
    /// Short headline.
    pub title: String,
    /// One or two sentence teaser shown on the card.
    pub summary: String,
    /// Full body shown in the detail overlay.
    pub content: String,
    /// Display date, conventionally `YYYY.MM.DD`.
    #[serde(default)]
    pub date: String,
    #[serde(deserialize_with = "concrete_category")]
    pub category: Category,
    /// Free-form estimate such as `"3 min"`.
    #[serde(default)]
    pub readTime: String,
    /// Display-only magnitude, intended 0-100 but not clamped. `null` reads as 0.
    #[serde(default, deserialize_with = "score_or_zero")]
    pub impactScore: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sourceUrl: Option<String>,
}

fn concrete_category<'de, D>(deserializer: D) -> Result<Category, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let category = raw.parse::<Category>().map_err(serde::de::Error::custom)?;
    if category.is_concrete() {
        Ok(category)
    } else {
        Err(serde::de::Error::custom(
            "ALL is a filter, not an article category",
        ))
    }
}

fn score_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or_default())
}

/// An ordered batch of articles, in the order the model returned them.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FetchResult {
    pub articles: Vec<Article>,
}
