/// Query state and the filter/sort pipeline
///
/// The UI layer owns a mutable `QueryState` and hands the engine an immutable
/// snapshot on every recomputation. `filter_and_sort` is pure: same inputs,
/// same output, no mutation of the catalog order.

use std::cmp::Ordering;
use std::collections::HashSet;

use super::data::{Catalog, Product};

/// Result ordering selected by the sort dropdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Featured,
    PriceAsc,
    PriceDesc,
    NameAsc,
    NameDesc,
    RatingDesc,
}

impl SortKey {
    /// Parse a sort name. Unknown values fall back to the featured order.
    pub fn parse(s: &str) -> Self {
        match s {
            "price-asc" => SortKey::PriceAsc,
            "price-desc" => SortKey::PriceDesc,
            "name-asc" => SortKey::NameAsc,
            "name-desc" => SortKey::NameDesc,
            "rating-desc" => SortKey::RatingDesc,
            _ => SortKey::Featured,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Featured => "featured",
            SortKey::PriceAsc => "price-asc",
            SortKey::PriceDesc => "price-desc",
            SortKey::NameAsc => "name-asc",
            SortKey::NameDesc => "name-desc",
            SortKey::RatingDesc => "rating-desc",
        }
    }
}

/// The current filter and sort selection.
///
/// An empty `categories` set is the "show all" sentinel. It is distinct from
/// a set that happens to contain every known category, even though both
/// produce the same results.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryState {
    /// Free-text search, matched as a substring across name, category,
    /// tags, and description
    pub query: String,
    /// Selected category names; empty means all
    pub categories: HashSet<String>,
    /// Inclusive lower price bound
    pub price_min: u32,
    /// Inclusive upper price bound
    pub price_max: u32,
    pub sort: SortKey,
}

impl QueryState {
    /// Initial state for a catalog: no filters, price bounds spanning
    /// the whole dataset, featured ordering.
    pub fn for_catalog(catalog: &Catalog) -> Self {
        let (min, max) = catalog.price_bounds();
        QueryState {
            query: String::new(),
            categories: HashSet::new(),
            price_min: min,
            price_max: max,
            sort: SortKey::Featured,
        }
    }

    /// Apply raw price input, clamping non-numeric text to the catalog's
    /// global bounds rather than rejecting it.
    pub fn set_price_input(&mut self, min: &str, max: &str, bounds: (u32, u32)) {
        self.price_min = min.trim().parse().unwrap_or(bounds.0);
        self.price_max = max.trim().parse().unwrap_or(bounds.1);
    }
}

/// Run the full pipeline: category filter, text filter, price filter, sort.
///
/// Each stage narrows the previous stage's output. The sort operates on a
/// copy of the surviving products; the input sequence is never reordered.
pub fn filter_and_sort(products: &[Product], state: &QueryState) -> Vec<Product> {
    let q = state.query.trim().to_lowercase();

    let mut result: Vec<Product> = products
        .iter()
        .filter(|p| state.categories.is_empty() || state.categories.contains(&p.category))
        .filter(|p| q.is_empty() || matches_query(p, &q))
        .filter(|p| p.price >= state.price_min && p.price <= state.price_max)
        .cloned()
        .collect();

    result.sort_by(|a, b| compare(a, b, state.sort));
    result
}

/// Substring match across the searchable fields. Unordered OR, no scoring.
fn matches_query(p: &Product, q: &str) -> bool {
    p.name.to_lowercase().contains(q)
        || p.category.to_lowercase().contains(q)
        || p.tags.iter().any(|t| t.to_lowercase().contains(q))
        || p.description.to_lowercase().contains(q)
}

fn compare(a: &Product, b: &Product, sort: SortKey) -> Ordering {
    match sort {
        SortKey::PriceAsc => a.price.cmp(&b.price),
        SortKey::PriceDesc => b.price.cmp(&a.price),
        SortKey::NameAsc => compare_names(&a.name, &b.name),
        SortKey::NameDesc => compare_names(&b.name, &a.name),
        SortKey::RatingDesc => compare_ratings(b, a),
        // Featured: badge weight, then rating, then the load-order index
        // as the final deterministic tie-break
        SortKey::Featured => b
            .badge
            .weight()
            .cmp(&a.badge.weight())
            .then_with(|| compare_ratings(b, a))
            .then_with(|| a.index.cmp(&b.index)),
    }
}

/// Case-insensitive name ordering, with the raw name as a tie-break so the
/// order stays total when two names differ only in case
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}

fn compare_ratings(a: &Product, b: &Product) -> Ordering {
    a.rating.partial_cmp(&b.rating).unwrap_or(Ordering::Equal)
}
