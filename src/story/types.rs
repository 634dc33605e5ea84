use super::status::StoryStatus;
use crate::common::{Document, FrontmatterError};
use crate::store::Ranked;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

/// Rank given to a story created without an explicit order.
pub const DEFAULT_ORDER: u32 = 1;

/// A love story as shown in the portfolio.
///
/// The JSON shape matches the studio REST API: `_id` for the identifier and
/// camelCase field names. Unknown fields (`__v` and friends) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
    /// Main image reference (URL, path or data URI).
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub gallery: Vec<String>,
    #[serde(default)]
    pub status: StoryStatus,
    /// Ranks that are negative, fractional or not numbers read as `None`.
    #[serde(
        default,
        deserialize_with = "lenient_order",
        skip_serializing_if = "Option::is_none"
    )]
    pub order: Option<u32>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// Interpret an API `order` value as a rank.
///
/// Whole numbers in `u32` range (also as numeric strings) are kept.
/// Anything else is logged and treated as unranked so one bad record
/// cannot fail a whole listing.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn rank_from_value(value: &Value) -> Option<u32> {
    match value {
        Value::Null => None,
        Value::Number(n) => {
            if let Some(int) = n.as_u64() {
                return u32::try_from(int).ok();
            }
            let float = n.as_f64()?;
            if float.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&float) {
                return Some(float as u32);
            }
            None
        }
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn lenient_order<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let rank = rank_from_value(&value);
    if rank.is_none() && !value.is_null() {
        warn!(order = %value, "Ignoring unusable story order");
    }
    Ok(rank)
}

impl Ranked for Story {
    fn id(&self) -> &str {
        &self.id
    }

    fn order(&self) -> Option<u32> {
        self.order
    }

    fn set_order(&mut self, order: u32) {
        self.order = Some(order);
    }
}

/// Frontmatter of a story document on disk.
///
/// The id lives in the file name, the title in the H1 heading and the
/// description in the body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryFrontmatter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
    #[serde(default)]
    pub status: StoryStatus,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub location: String,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub gallery: Vec<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl Story {
    /// Rebuild a story from its on-disk document.
    #[must_use]
    pub fn from_document(id: &str, doc: Document<StoryFrontmatter>) -> Self {
        let Document {
            metadata,
            title,
            body,
        } = doc;
        Self {
            id: id.to_string(),
            title,
            location: metadata.location,
            description: body,
            thumbnail: metadata.thumbnail,
            gallery: metadata.gallery,
            status: metadata.status,
            order: metadata.order,
            created_at: metadata.created_at,
            updated_at: metadata.updated_at,
        }
    }

    /// Render the story as a Markdown document.
    pub fn to_markdown(&self) -> Result<String, FrontmatterError> {
        let frontmatter = StoryFrontmatter {
            order: self.order,
            status: self.status,
            location: self.location.clone(),
            thumbnail: self.thumbnail.clone(),
            gallery: self.gallery.clone(),
            created_at: self.created_at.clone(),
            updated_at: self.updated_at.clone(),
        };
        crate::common::render_document(&frontmatter, &self.title, &self.description)
    }
}

/// Options for creating a story.
#[derive(Debug, Clone, Default)]
pub struct CreateStoryOptions {
    pub title: String,
    pub location: String,
    pub description: String,
    pub thumbnail: String,
    pub gallery: Vec<String>,
    pub status: Option<StoryStatus>,
    /// Display priority; defaults to [`DEFAULT_ORDER`].
    pub order: Option<u32>,
}

/// Options for updating a story. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateStoryOptions {
    pub title: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    pub gallery: Option<Vec<String>>,
    pub status: Option<StoryStatus>,
    pub order: Option<u32>,
}
