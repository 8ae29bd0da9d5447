use crate::api::ItemStore;
use crate::models::{Category, Condition, Item, ItemStatus};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::warn;

/// Catalog ordering
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Newest first (default)
    #[default]
    Newest,
    /// Most viewed first
    Popular,
    /// Cheapest in ReWards first
    PriceLow,
    /// Most expensive in ReWards first
    PriceHigh,
}

/// Filter criteria for the catalog. `None` selectors are inactive.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFilter {
    /// Case-insensitive substring match over title, brand and tags
    pub search: Option<String>,
    pub category: Option<Category>,
    pub brand: Option<String>,
    pub condition: Option<Condition>,
    pub sort: SortKey,
}

fn matches_search(item: &Item, needle: &str) -> bool {
    let needle = needle.to_lowercase();
    item.title.to_lowercase().contains(&needle)
        || item.brand.to_lowercase().contains(&needle)
        || item
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(&needle))
}

/// Apply all active filters conjunctively, then sort by the selected key.
///
/// Items that are not `Available` never appear, regardless of the other
/// criteria. Sorting is stable: ties keep their prior relative order.
pub fn filter_and_sort(items: &[Item], filter: &CatalogFilter) -> Vec<Item> {
    let mut filtered: Vec<Item> = items
        .iter()
        .filter(|item| item.status == ItemStatus::Available)
        .filter(|item| match &filter.search {
            Some(needle) if !needle.is_empty() => matches_search(item, needle),
            _ => true,
        })
        .filter(|item| match filter.category {
            Some(category) => item.category == Some(category),
            None => true,
        })
        .filter(|item| match &filter.brand {
            Some(brand) => &item.brand == brand,
            None => true,
        })
        .filter(|item| match filter.condition {
            Some(condition) => item.condition == Some(condition),
            None => true,
        })
        .cloned()
        .collect();

    match filter.sort {
        SortKey::Newest => filtered.sort_by(|a, b| b.created_date.cmp(&a.created_date)),
        SortKey::Popular => filtered.sort_by(|a, b| b.views.cmp(&a.views)),
        SortKey::PriceLow => filtered.sort_by(|a, b| a.rewards_value.cmp(&b.rewards_value)),
        SortKey::PriceHigh => filtered.sort_by(|a, b| b.rewards_value.cmp(&a.rewards_value)),
    }

    filtered
}

/// Distinct brands present in the available collection, lexicographically
/// sorted, for populating the brand selector. Derived from the unfiltered
/// base collection, not the current filtered view. Items with an empty
/// brand are deliberately excluded: an unnamed facet cannot be selected.
pub fn brand_facets(items: &[Item]) -> Vec<String> {
    items
        .iter()
        .filter(|item| item.status == ItemStatus::Available)
        .filter(|item| !item.brand.is_empty())
        .map(|item| item.brand.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Fire-and-forget view-count bump when an item is opened for detail view.
///
/// Failure is logged and never surfaced; navigation must not wait on it.
pub fn record_view(store: Arc<dyn ItemStore>, item_id: impl Into<String>) {
    let item_id = item_id.into();
    tokio::spawn(async move {
        if let Err(e) = store.increment_views(&item_id).await {
            warn!(item_id = %item_id, error = %e, "Failed to record item view");
        }
    });
}
