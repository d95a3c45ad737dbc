//! In-process catalog over a fixed set of items

use super::{CatalogItem, CatalogPreview, CatalogSearch};
use crate::error::{Result, RouteWiseError};
use std::collections::HashMap;

/// Catalog backed by an in-memory item list.
///
/// An item matches when any query word longer than two characters appears
/// in its title or path. Items keep insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    items: Vec<CatalogItem>,
    contents: HashMap<String, String>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an item with the content returned by `preview`
    pub fn with_item(mut self, item: CatalogItem, content: impl Into<String>) -> Self {
        self.contents.insert(item.path.clone(), content.into());
        self.items.push(item);
        self
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[async_trait::async_trait]
impl CatalogSearch for MemoryCatalog {
    async fn search(&self, query: &str) -> Result<Vec<CatalogItem>> {
        let words: Vec<String> = query
            .to_lowercase()
            .split_whitespace()
            .filter(|w| w.chars().count() > 2)
            .map(String::from)
            .collect();

        Ok(self
            .items
            .iter()
            .filter(|item| {
                let haystack = format!("{} {}", item.title, item.path).to_lowercase();
                words.iter().any(|w| haystack.contains(w.as_str()))
            })
            .cloned()
            .collect())
    }

    async fn preview(&self, path: &str) -> Result<CatalogPreview> {
        let item = self
            .items
            .iter()
            .find(|item| item.path == path)
            .ok_or_else(|| RouteWiseError::Catalog(format!("Unknown catalog path: {}", path)))?;

        Ok(CatalogPreview {
            title: item.title.clone(),
            content: self.contents.get(path).cloned().unwrap_or_default(),
            raw_url: item.raw_url.clone(),
        })
    }
}
