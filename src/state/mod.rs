/// State management module
///
/// This module handles all catalog-side state, including:
/// - Product records and dataset loading (data.rs)
/// - Query state and the filter/sort pipeline (query.rs)
/// - Favorites persistence (favorites.rs)

pub mod data;
pub mod favorites;
pub mod query;
