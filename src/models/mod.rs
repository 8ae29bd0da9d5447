use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Top-level catalog category
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Men,
    Women,
    Accessories,
}

impl Category {
    /// Lenient parse for values coming back from the analyzer or a URL.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "men" => Some(Category::Men),
            "women" => Some(Category::Women),
            "accessories" => Some(Category::Accessories),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Men => "men",
            Category::Women => "women",
            Category::Accessories => "accessories",
        }
    }
}

/// Item condition grade
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    New,
    LikeNew,
    Good,
    Fair,
    Poor,
}

impl Condition {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "new" => Some(Condition::New),
            "like_new" => Some(Condition::LikeNew),
            "good" => Some(Condition::Good),
            "fair" => Some(Condition::Fair),
            "poor" => Some(Condition::Poor),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::New => "new",
            Condition::LikeNew => "like_new",
            Condition::Good => "good",
            Condition::Fair => "fair",
            Condition::Poor => "poor",
        }
    }
}

/// Lifecycle status of a listed item. Only `Available` items reach the catalog.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    #[default]
    Available,
    Pending,
    Swapped,
}

/// A clothing item listed for swapping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub subcategory: String,
    #[serde(default)]
    pub style: String,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub condition: Option<Condition>,
    #[serde(default)]
    pub description: String,
    /// Ordered, no duplicates
    #[serde(default)]
    pub tags: Vec<String>,
    /// Ordered image URLs, first entry is the cover
    #[serde(default)]
    pub images: Vec<String>,
    /// Point value in ReWards
    #[serde(default)]
    pub rewards_value: u32,
    #[serde(default)]
    pub status: ItemStatus,
    #[serde(default)]
    pub views: u32,
    pub owner_id: String,
    pub created_date: DateTime<Utc>,
}

/// Fields sent when creating a new item; the backend assigns id, status,
/// views and created_date.
#[derive(Debug, Clone, Serialize)]
pub struct NewItem {
    pub title: String,
    pub brand: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    pub subcategory: String,
    pub style: String,
    pub size: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
    pub description: String,
    pub tags: Vec<String>,
    pub images: Vec<String>,
    pub rewards_value: u32,
    pub owner_id: String,
}

/// A swap proposal between two users. External collection; carried here only
/// so the API layer can type its CRUD calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapRequest {
    pub id: String,
    pub requester_id: String,
    pub owner_id: String,
    pub requested_item_id: String,
    #[serde(default)]
    pub offered_item_id: Option<String>,
    #[serde(default)]
    pub points_offered: Option<u32>,
    #[serde(default)]
    pub message: String,
    pub status: String,
    #[serde(rename = "type")]
    pub swap_type: String,
    #[serde(default)]
    pub delivery_tracking_id: Option<String>,
}

/// One event in a delivery timeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingEvent {
    pub timestamp: DateTime<Utc>,
    pub status: String,
    #[serde(default)]
    pub location: String,
}

/// Shipment tracking for a completed swap. External collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryTracking {
    pub id: String,
    pub swap_request_id: String,
    pub tracking_number: String,
    pub status: String,
    #[serde(default)]
    pub estimated_delivery: Option<DateTime<Utc>>,
    #[serde(default)]
    pub carrier: String,
    #[serde(default)]
    pub timeline: Vec<TrackingEvent>,
}

/// The signed-in user as reported by the identity service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub points: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parse_is_lenient() {
        assert_eq!(Category::parse(" Women "), Some(Category::Women));
        assert_eq!(Category::parse("MEN"), Some(Category::Men));
        assert_eq!(Category::parse("shoes"), None);
        assert_eq!(Category::parse(""), None);
    }

    #[test]
    fn condition_round_trips_snake_case() {
        let json = serde_json::to_string(&Condition::LikeNew).unwrap();
        assert_eq!(json, "\"like_new\"");
        assert_eq!(Condition::parse("like_new"), Some(Condition::LikeNew));
    }

    #[test]
    fn swap_request_maps_the_type_field() {
        let swap: SwapRequest = serde_json::from_str(
            r#"{
                "id": "s1",
                "requester_id": "u1",
                "owner_id": "u2",
                "requested_item_id": "i1",
                "points_offered": 80,
                "status": "pending",
                "type": "points"
            }"#,
        )
        .unwrap();
        assert_eq!(swap.swap_type, "points");
        assert_eq!(swap.points_offered, Some(80));
        assert_eq!(swap.offered_item_id, None);
    }

    #[test]
    fn delivery_tracking_defaults_an_empty_timeline() {
        let tracking: DeliveryTracking = serde_json::from_str(
            r#"{
                "id": "d1",
                "swap_request_id": "s1",
                "tracking_number": "ZX123",
                "status": "in_transit"
            }"#,
        )
        .unwrap();
        assert!(tracking.timeline.is_empty());
        assert_eq!(tracking.estimated_delivery, None);
    }

    #[test]
    fn item_deserializes_with_missing_counters() {
        let item: Item = serde_json::from_str(
            r#"{
                "id": "1",
                "title": "Wool Coat",
                "owner_id": "u1",
                "created_date": "2024-03-01T12:00:00Z"
            }"#,
        )
        .unwrap();
        assert_eq!(item.views, 0);
        assert_eq!(item.rewards_value, 0);
        assert_eq!(item.status, ItemStatus::Available);
        assert!(item.tags.is_empty());
    }
}
