use crate::api::{Analyzer, Identity, ItemAnalysis, ItemStore, MediaStore};
use crate::models::{Category, Condition, Item, NewItem};
use futures::stream::{FuturesUnordered, StreamExt};
use std::time::Duration;
use tracing::{info, warn};

/// How long the success acknowledgment stays on screen before navigating away.
pub const SUCCESS_REDIRECT_DELAY: Duration = Duration::from_secs(2);

/// Where the listing workflow currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListingState {
    #[default]
    Empty,
    ImagesUploading,
    Analyzing,
    FormEditing,
    Submitting,
    Succeeded,
}

/// What an analyzer result does to fields the user may have already edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrefillMode {
    /// Every returned field replaces the form field (observed contract)
    #[default]
    Overwrite,
    /// Only fields that are still empty/zero are filled
    FillEmptyOnly,
}

/// What one failed upload does to the rest of its batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchFailure {
    /// One rejection drops the whole batch (observed contract)
    #[default]
    AbortAll,
    /// Successful URLs are kept, the failure is logged
    KeepSuccesses,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ListingOptions {
    pub prefill: PrefillMode,
    pub batch_failure: BatchFailure,
}

/// A local file picked for upload.
#[derive(Debug, Clone)]
pub struct LocalImage {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Draft state for the "List Your Item" workflow.
///
/// Collects images (uploaded concurrently), optionally prefills fields from
/// the image analyzer, manages tags, and submits the create call once the
/// draft has a title and at least one image. All network failures are logged
/// and leave the draft editable; none are surfaced as errors.
#[derive(Debug, Default)]
pub struct ListingForm {
    pub title: String,
    pub brand: String,
    pub category: Option<Category>,
    pub subcategory: String,
    pub style: String,
    pub size: String,
    pub condition: Option<Condition>,
    pub description: String,
    pub tags: Vec<String>,
    pub images: Vec<String>,
    pub rewards_value: u32,
    state: ListingState,
    analyzed: bool,
    options: ListingOptions,
}

impl ListingForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ListingOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn state(&self) -> ListingState {
        self.state
    }

    /// Add a tag. No-op when the trimmed input is empty or already present
    /// (case-sensitive). Returns whether the tag was added.
    pub fn add_tag(&mut self, raw: &str) -> bool {
        let tag = raw.trim();
        if tag.is_empty() || self.tags.iter().any(|t| t == tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }

    /// Remove the single matching tag entry, if present.
    pub fn remove_tag(&mut self, tag: &str) {
        if let Some(pos) = self.tags.iter().position(|t| t == tag) {
            self.tags.remove(pos);
        }
    }

    pub fn remove_image(&mut self, index: usize) {
        if index < self.images.len() {
            self.images.remove(index);
        }
    }

    /// Submission requires a title and at least one image.
    pub fn can_submit(&self) -> bool {
        !self.title.is_empty() && !self.images.is_empty()
    }

    /// Upload a batch of images concurrently and append the resulting URLs.
    ///
    /// URLs are appended in completion order, not request order. When the
    /// first image of the session lands and the title is still empty, the
    /// analyzer is invoked exactly once to prefill the form; analyzer
    /// failure leaves the form unchanged.
    pub async fn upload_images(
        &mut self,
        files: Vec<LocalImage>,
        media: &dyn MediaStore,
        analyzer: &dyn Analyzer,
    ) {
        if files.is_empty() {
            return;
        }
        self.state = ListingState::ImagesUploading;

        let mut pending: FuturesUnordered<_> = files
            .into_iter()
            .map(|file| {
                let LocalImage { filename, bytes } = file;
                async move { media.upload(&filename, bytes).await }
            })
            .collect();

        let mut completed = Vec::new();
        let mut aborted = false;
        while let Some(result) = pending.next().await {
            match result {
                Ok(url) => completed.push(url),
                Err(e) => {
                    warn!(error = %e, "Image upload failed");
                    if self.options.batch_failure == BatchFailure::AbortAll {
                        aborted = true;
                        break;
                    }
                }
            }
        }
        drop(pending);

        if aborted {
            completed.clear();
        }

        let session_first_upload = self.images.is_empty() && !completed.is_empty();
        self.images.extend(completed);

        if self.images.is_empty() {
            self.state = ListingState::Empty;
            return;
        }

        if session_first_upload && !self.analyzed {
            self.analyzed = true;
            if self.title.is_empty() {
                // first() is safe: session_first_upload implies a new URL landed
                let cover = self.images[0].clone();
                self.state = ListingState::Analyzing;
                match analyzer.analyze(&cover).await {
                    Ok(analysis) => self.apply_analysis(analysis),
                    Err(e) => warn!(error = %e, "Image analysis failed"),
                }
            }
        }

        self.state = ListingState::FormEditing;
    }

    fn push_unique_tag(&mut self, tag: String) {
        let tag = tag.trim().to_string();
        if !tag.is_empty() && !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
    }

    fn apply_analysis(&mut self, analysis: ItemAnalysis) {
        match self.options.prefill {
            PrefillMode::Overwrite => {
                self.title = analysis.title;
                self.brand = analysis.brand;
                self.category = Category::parse(&analysis.category);
                self.subcategory = analysis.subcategory;
                self.condition = Condition::parse(&analysis.condition);
                self.style = analysis.style;
                self.description = analysis.description;
                self.rewards_value = analysis.estimated_rewards_value;
                self.tags.clear();
                for tag in analysis.tags {
                    self.push_unique_tag(tag);
                }
            }
            PrefillMode::FillEmptyOnly => {
                if self.title.is_empty() {
                    self.title = analysis.title;
                }
                if self.brand.is_empty() {
                    self.brand = analysis.brand;
                }
                if self.category.is_none() {
                    self.category = Category::parse(&analysis.category);
                }
                if self.subcategory.is_empty() {
                    self.subcategory = analysis.subcategory;
                }
                if self.condition.is_none() {
                    self.condition = Condition::parse(&analysis.condition);
                }
                if self.style.is_empty() {
                    self.style = analysis.style;
                }
                if self.description.is_empty() {
                    self.description = analysis.description;
                }
                if self.rewards_value == 0 {
                    self.rewards_value = analysis.estimated_rewards_value;
                }
                if self.tags.is_empty() {
                    for tag in analysis.tags {
                        self.push_unique_tag(tag);
                    }
                }
            }
        }
    }

    /// Create the item, stamped with the current user as owner.
    ///
    /// Returns None without issuing a create call when the draft is
    /// incomplete or there is no signed-in user. Network failure returns the
    /// workflow to editing; success transitions to `Succeeded` and the UI is
    /// expected to wait [`SUCCESS_REDIRECT_DELAY`] before navigating away.
    pub async fn submit(&mut self, items: &dyn ItemStore, identity: &dyn Identity) -> Option<Item> {
        if !self.can_submit() {
            return None;
        }

        let user = match identity.current_user().await {
            Ok(Some(user)) => user,
            Ok(None) => {
                warn!("Cannot submit a listing without a signed-in user");
                return None;
            }
            Err(e) => {
                warn!(error = %e, "Failed to resolve current user");
                return None;
            }
        };

        self.state = ListingState::Submitting;
        let fields = NewItem {
            title: self.title.clone(),
            brand: self.brand.clone(),
            category: self.category,
            subcategory: self.subcategory.clone(),
            style: self.style.clone(),
            size: self.size.clone(),
            condition: self.condition,
            description: self.description.clone(),
            tags: self.tags.clone(),
            images: self.images.clone(),
            rewards_value: self.rewards_value,
            owner_id: user.id,
        };

        match items.create(fields).await {
            Ok(item) => {
                info!(item_id = %item.id, "Listing created");
                self.state = ListingState::Succeeded;
                Some(item)
            }
            Err(e) => {
                warn!(error = %e, "Failed to create listing");
                self.state = ListingState::FormEditing;
                None
            }
        }
    }
}

/// Hold the success acknowledgment on screen for the fixed delay.
pub async fn success_delay() {
    tokio::time::sleep(SUCCESS_REDIRECT_DELAY).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adding_a_duplicate_tag_is_a_no_op() {
        let mut form = ListingForm::new();
        assert!(form.add_tag("vintage"));
        assert!(!form.add_tag("vintage"));
        assert!(!form.add_tag("  vintage  "));
        assert_eq!(form.tags, vec!["vintage"]);
    }

    #[test]
    fn tag_matching_is_case_sensitive() {
        let mut form = ListingForm::new();
        assert!(form.add_tag("Vintage"));
        assert!(form.add_tag("vintage"));
        assert_eq!(form.tags.len(), 2);
    }

    #[test]
    fn empty_tag_input_is_rejected() {
        let mut form = ListingForm::new();
        assert!(!form.add_tag("   "));
        assert!(form.tags.is_empty());
    }

    #[test]
    fn remove_tag_deletes_the_matching_entry() {
        let mut form = ListingForm::new();
        form.add_tag("denim");
        form.add_tag("casual");
        form.remove_tag("denim");
        assert_eq!(form.tags, vec!["casual"]);
        form.remove_tag("missing");
        assert_eq!(form.tags, vec!["casual"]);
    }

    #[test]
    fn remove_image_ignores_out_of_range() {
        let mut form = ListingForm::new();
        form.images = vec!["a".to_string(), "b".to_string()];
        form.remove_image(0);
        assert_eq!(form.images, vec!["b"]);
        form.remove_image(5);
        assert_eq!(form.images, vec!["b"]);
    }

    #[test]
    fn submission_requires_title_and_image() {
        let mut form = ListingForm::new();
        assert!(!form.can_submit());
        form.images.push("http://img/1.jpg".to_string());
        assert!(!form.can_submit());
        form.title = "Wool Coat".to_string();
        assert!(form.can_submit());
        form.images.clear();
        assert!(!form.can_submit());
    }

    fn analysis() -> ItemAnalysis {
        ItemAnalysis {
            title: "Vintage Denim Jacket".to_string(),
            brand: "Levi's".to_string(),
            category: "women".to_string(),
            subcategory: "jackets".to_string(),
            condition: "like_new".to_string(),
            style: "casual".to_string(),
            estimated_rewards_value: 120,
            tags: vec![
                "denim".to_string(),
                "vintage".to_string(),
                "denim".to_string(),
            ],
            description: "Classic trucker jacket".to_string(),
        }
    }

    #[test]
    fn overwrite_prefill_replaces_user_input() {
        let mut form = ListingForm::new();
        form.title = "My title".to_string();
        form.rewards_value = 10;
        form.add_tag("mine");

        form.apply_analysis(analysis());

        assert_eq!(form.title, "Vintage Denim Jacket");
        assert_eq!(form.category, Some(Category::Women));
        assert_eq!(form.condition, Some(Condition::LikeNew));
        assert_eq!(form.rewards_value, 120);
        // duplicates in the analyzer response are collapsed
        assert_eq!(form.tags, vec!["denim", "vintage"]);
    }

    #[test]
    fn overwrite_prefill_blanks_fields_absent_from_response() {
        let mut form = ListingForm::new();
        form.brand = "User Brand".to_string();
        form.apply_analysis(ItemAnalysis::default());
        assert!(form.brand.is_empty());
        assert_eq!(form.rewards_value, 0);
        assert_eq!(form.category, None);
    }

    #[test]
    fn fill_empty_prefill_keeps_user_input() {
        let mut form = ListingForm::with_options(ListingOptions {
            prefill: PrefillMode::FillEmptyOnly,
            ..Default::default()
        });
        form.title = "My title".to_string();
        form.add_tag("mine");

        form.apply_analysis(analysis());

        assert_eq!(form.title, "My title");
        assert_eq!(form.tags, vec!["mine"]);
        // empty fields are still filled
        assert_eq!(form.brand, "Levi's");
        assert_eq!(form.rewards_value, 120);
    }

    #[test]
    fn unknown_category_from_analyzer_is_dropped() {
        let mut form = ListingForm::new();
        let mut a = analysis();
        a.category = "footwear".to_string();
        a.condition = "mint".to_string();
        form.apply_analysis(a);
        assert_eq!(form.category, None);
        assert_eq!(form.condition, None);
    }
}
