use crate::api::error::Result;
use crate::models::{DeliveryTracking, Item, NewItem, SwapRequest, User};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;

/// CRUD access to the Item collection.
///
/// Filterable fields: title, brand, category, subcategory, style, size,
/// condition, description, tags, images, rewards_value, status, views,
/// owner_id.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// List items, ordered per the backend sort spec (e.g. "-created_date").
    async fn list(&self, sort: &str) -> Result<Vec<Item>>;

    /// Create an item; the backend assigns the id.
    async fn create(&self, fields: NewItem) -> Result<Item>;

    /// Partially update an item by id.
    async fn update(&self, id: &str, patch: serde_json::Value) -> Result<Item>;

    /// Bump the view counter by one.
    ///
    /// A first-class operation so a real store can increment atomically;
    /// emulating it with read-then-update loses updates under concurrent
    /// viewers.
    async fn increment_views(&self, id: &str) -> Result<()>;
}

/// CRUD access to the SwapRequest collection.
///
/// Filterable fields: requester_id, owner_id, requested_item_id,
/// offered_item_id, points_offered, message, status, type,
/// delivery_tracking_id.
#[async_trait]
pub trait SwapRequestStore: Send + Sync {
    async fn list(&self, sort: &str) -> Result<Vec<SwapRequest>>;
    async fn create(&self, fields: serde_json::Value) -> Result<SwapRequest>;
    async fn update(&self, id: &str, patch: serde_json::Value) -> Result<SwapRequest>;
}

/// CRUD access to the DeliveryTracking collection.
///
/// Filterable fields: swap_request_id, tracking_number, status,
/// estimated_delivery, carrier, timeline.
#[async_trait]
pub trait DeliveryTrackingStore: Send + Sync {
    async fn list(&self, sort: &str) -> Result<Vec<DeliveryTracking>>;
    async fn create(&self, fields: serde_json::Value) -> Result<DeliveryTracking>;
    async fn update(&self, id: &str, patch: serde_json::Value) -> Result<DeliveryTracking>;
}

/// File upload collaborator: local bytes in, hosted URL out.
#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn upload(&self, filename: &str, bytes: Vec<u8>) -> Result<String>;
}

/// Structured guess produced by the image analyzer. Every field is optional
/// on the wire; absent fields fall back to empty/zero.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ItemAnalysis {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub subcategory: String,
    #[serde(default)]
    pub condition: String,
    #[serde(default)]
    pub style: String,
    #[serde(default)]
    pub estimated_rewards_value: u32,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub description: String,
}

/// Image analysis collaborator used to prefill a listing draft.
#[async_trait]
pub trait Analyzer: Send + Sync {
    async fn analyze(&self, image_url: &str) -> Result<ItemAnalysis>;
}

/// Session identity collaborator.
#[async_trait]
pub trait Identity: Send + Sync {
    /// The signed-in user, or None when there is no session.
    async fn current_user(&self) -> Result<Option<User>>;
    async fn login(&self) -> Result<()>;
    async fn logout(&self) -> Result<()>;
}
