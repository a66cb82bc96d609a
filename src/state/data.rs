/// Shared data structures for the catalog state
///
/// These structs represent the product records that flow between
/// the dataset loader, the query engine, and the presentation layer.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Promotional badge attached to a product card.
/// The dataset encodes the absence of a badge as an empty string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Badge {
    New,
    Sale,
    #[default]
    None,
}

impl Badge {
    /// Priority weight used by the featured sort (higher sorts first)
    pub fn weight(self) -> u8 {
        match self {
            Badge::New => 2,
            Badge::Sale => 1,
            Badge::None => 0,
        }
    }

    /// Display label, empty for unbadged products
    pub fn label(self) -> &'static str {
        match self {
            Badge::New => "NEW",
            Badge::Sale => "SALE",
            Badge::None => "",
        }
    }
}

impl From<String> for Badge {
    fn from(s: String) -> Self {
        match s.as_str() {
            "NEW" => Badge::New,
            "SALE" => Badge::Sale,
            _ => Badge::None,
        }
    }
}

impl From<Badge> for String {
    fn from(badge: Badge) -> Self {
        badge.label().to_string()
    }
}

/// Represents a single product in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Stable unique identifier
    pub id: u32,
    /// Display name (e.g., "Masala Chai Loose Leaf")
    pub name: String,
    /// Category name, matched exactly by the category filter
    pub category: String,
    /// Whole-rupee price, no minor units
    pub price: u32,
    /// Average rating, 0.0 to 5.0
    pub rating: f32,
    /// Promotional badge, if any
    #[serde(default)]
    pub badge: Badge,
    /// Search tags in dataset order
    pub tags: Vec<String>,
    /// Longer description shown in the detail view
    pub description: String,
    /// Explicit remote image URLs, if the dataset carries any
    #[serde(default)]
    pub images: Vec<String>,
    /// Position in the original dataset load order. Assigned once at load
    /// and used only as the final sort tie-breaker, never reassigned.
    #[serde(skip)]
    pub index: usize,
}

/// Errors raised while loading the product dataset.
/// An empty catalog is fatal: the app cannot render anything without products.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read product dataset: {0}")]
    Read(#[from] std::io::Error),
    #[error("product dataset is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("product dataset is empty")]
    Empty,
}

/// The full in-memory product collection, plus values derived once at load:
/// the sorted category list and the global price bounds.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
    categories: Vec<String>,
    price_bounds: (u32, u32),
}

impl Catalog {
    /// Parse a catalog from a JSON array of product records.
    /// Assigns each product its load-order index.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let mut products: Vec<Product> = serde_json::from_str(json)?;
        if products.is_empty() {
            return Err(CatalogError::Empty);
        }

        for (i, product) in products.iter_mut().enumerate() {
            product.index = i;
        }

        // Category list and price bounds are derived once and never mutated
        let mut categories: Vec<String> =
            products.iter().map(|p| p.category.clone()).collect();
        categories.sort();
        categories.dedup();

        let min = products.iter().map(|p| p.price).min().unwrap_or(0);
        let max = products.iter().map(|p| p.price).max().unwrap_or(0);

        Ok(Catalog {
            products,
            categories,
            price_bounds: (min, max),
        })
    }

    /// Load the dataset bundled with the binary
    pub fn load_embedded() -> Result<Self, CatalogError> {
        Self::from_json(include_str!("../../data/products.json"))
    }

    /// Load a dataset from a JSON file on disk
    pub fn load_from_path(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// All products in load order
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Sorted unique category names
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Global (min, max) price across the dataset
    pub fn price_bounds(&self) -> (u32, u32) {
        self.price_bounds
    }

    /// Look up a product by id
    pub fn find(&self, id: u32) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Number of products in the catalog
    pub fn len(&self) -> usize {
        self.products.len()
    }
}
