use serde::{Deserialize, Serialize};

/// A cached item. `id` is assigned by the store on insertion and never
/// changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    pub title: String,
    pub image_url: String,
}

impl Item {
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            "(Untitled)"
        } else {
            &self.title
        }
    }
}

/// Insert payload for the item store.
///
/// `id: None` lets the store assign the next auto-increment id;
/// `id: Some(_)` overwrites any row with the same id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub id: Option<i64>,
    pub title: String,
    pub image_url: String,
}

impl NewItem {
    pub fn new(title: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            image_url: image_url.into(),
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }
}

/// A record as served by the remote source. It carries no identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRecord {
    pub title: String,
    #[serde(rename = "url")]
    pub image_url: String,
}

impl From<RemoteRecord> for NewItem {
    fn from(record: RemoteRecord) -> Self {
        NewItem::new(record.title, record.image_url)
    }
}
