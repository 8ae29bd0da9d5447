use rewear::api::{Base44Client, ItemStore};
use rewear::catalog::{brand_facets, filter_and_sort, CatalogFilter, SortKey};
use rewear::config::Config;
use rewear::models::Category;
use tracing::{info, Level};
use tracing_subscriber;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    info!("👗 ReWear - Catalog Browser");
    info!("===========================");
    info!("");

    let config = Config::from_env()?;
    let client = Base44Client::new(config)?;

    info!("Fetching items from the backend...");
    let items = client.list("-created_date").await?;
    info!("Fetched {} items", items.len());

    // Browse like the catalog page would: available items, newest first,
    // then a category drill-down
    let filter = CatalogFilter {
        category: args_category(),
        sort: SortKey::Newest,
        ..Default::default()
    };
    let catalog = filter_and_sort(&items, &filter);

    info!("\n✅ {} items in the catalog\n", catalog.len());

    for (i, item) in catalog.iter().enumerate() {
        println!("{}. {} ({} ReWards)", i + 1, item.title, item.rewards_value);
        if !item.brand.is_empty() {
            println!("   Brand: {}", item.brand);
        }
        if let Some(condition) = item.condition {
            println!("   Condition: {}", condition.as_str());
        }
        println!("   Views: {}", item.views);
        if let Some(cover) = item.images.first() {
            println!("   Cover: {}", cover);
        }
        println!();
    }

    let brands = brand_facets(&items);
    info!("Brands available: {}", brands.join(", "));

    Ok(())
}

/// Optional category drill-down from the first CLI argument.
fn args_category() -> Option<Category> {
    std::env::args().nth(1).and_then(|arg| Category::parse(&arg))
}
