pub mod base44;
pub mod error;
pub mod traits;

pub use base44::Base44Client;
pub use error::{ApiError, Result};
pub use traits::{
    Analyzer, DeliveryTrackingStore, Identity, ItemAnalysis, ItemStore, MediaStore,
    SwapRequestStore,
};
