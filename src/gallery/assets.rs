//! Load status of every external asset the gallery asked for.

use std::collections::BTreeMap;

use crate::error::GalleryError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssetStatus {
    Pending,
    Loaded,
    Failed(String),
}

/// Path -> status. Only load completions write to it.
#[derive(Clone, Debug, Default)]
pub struct AssetRegistry {
    entries: BTreeMap<String, AssetStatus>,
}

impl AssetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, path: &str) {
        self.entries
            .entry(path.to_string())
            .or_insert(AssetStatus::Pending);
    }

    pub fn mark_loaded(&mut self, path: &str) {
        log::info!("loaded {path}");
        self.entries.insert(path.to_string(), AssetStatus::Loaded);
    }

    /// Records a failed load. Errors other than asset failures are ignored.
    pub fn mark_failed(&mut self, error: &GalleryError) {
        if let GalleryError::AssetLoadFailed { path, reason } = error {
            log::warn!("{error}");
            self.entries
                .insert(path.clone(), AssetStatus::Failed(reason.clone()));
        }
    }

    pub fn status(&self, path: &str) -> Option<&AssetStatus> {
        self.entries.get(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AssetStatus)> {
        self.entries.iter().map(|(path, status)| (path.as_str(), status))
    }

    pub fn pending(&self) -> usize {
        self.count(|status| *status == AssetStatus::Pending)
    }

    pub fn failed(&self) -> usize {
        self.count(|status| matches!(status, AssetStatus::Failed(_)))
    }

    fn count(&self, predicate: impl Fn(&AssetStatus) -> bool) -> usize {
        self.entries.values().filter(|status| predicate(status)).count()
    }
}
