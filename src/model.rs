use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single entry in the asset library.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Asset {
    pub id: String,
    pub title: String,
    pub description: String,
    pub images: Vec<Image>,
    #[serde(rename = "type")]
    pub kind: AssetKind,
    pub tags: Vec<Tag>,
    pub category: Category,
    #[serde(rename = "addedAt")]
    pub added_at: i64,
}

impl Asset {
    /// Build a new asset with a fresh id and server-set creation timestamp
    /// (epoch milliseconds).
    pub fn create(
        title: String,
        description: String,
        images: Vec<Image>,
        kind: AssetKind,
        tags: Vec<Tag>,
        category: Category,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title,
            description,
            images,
            kind,
            tags,
            category,
            added_at: Utc::now().timestamp_millis(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Image {
    pub url: String,
    pub height: f64,
    pub width: f64,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tag {
    pub name: String,
    pub path: String,
}

/// What kind of content an asset is.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AssetKind {
    Plugin,
    #[serde(rename = "3D Asset")]
    ThreeD,
    #[serde(rename = "2D Asset")]
    TwoD,
    #[serde(rename = "SFX")]
    Sfx,
    #[serde(rename = "VFX")]
    Vfx,
    Other,
}

/// Which engine/ecosystem an asset belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Category {
    #[serde(rename = "UE4")]
    Ue4,
    Unity,
    Misc,
    General,
}

/// A registered account. The password field holds a salted bcrypt hash and
/// must never reach a response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub password: String,
}

impl User {
    pub fn create(username: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            username,
            password: password_hash,
        }
    }
}
