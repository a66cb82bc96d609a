/// Image-source candidate derivation
///
/// Every displayed image gets an ordered candidate list: local per-product
/// files first, then category defaults, then any explicit URLs on the
/// record, then remote placeholder services as the last resort. The list is
/// a pure function of the product, the requested size, and the variant slot.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::state::data::Product;

/// Requested pixel size for an image slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSize {
    pub w: u32,
    pub h: u32,
}

/// Default size for card and modal main images
pub const CARD_SIZE: ImageSize = ImageSize { w: 800, h: 600 };

/// Size for modal gallery thumbnails
pub const THUMB_SIZE: ImageSize = ImageSize { w: 150, h: 150 };

/// Image encodings in preference order, most compressed first
const ENCODINGS: [&str; 3] = ["webp", "jpg", "png"];

/// Per-product image slots (product-slug-1 .. product-slug-3)
const PRODUCT_SLOTS: u32 = 3;

/// Category-default image slots
const DEFAULT_SLOTS: u32 = 2;

/// Characters escaped in the stock-photo query string. Matches JavaScript's
/// encodeURIComponent: alphanumerics and - _ . ! ~ * ' ( ) pass through.
const QUERY_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Normalize a display string into a filesystem/URL-safe slug:
/// lower-cased, runs of non-alphanumerics collapsed to one dash,
/// leading and trailing dashes stripped.
///
/// Two names that collapse to the same slug share candidates. That is an
/// accepted limitation of the naming scheme, not something to repair here.
pub fn slugify(s: &str) -> String {
    let mut slug = String::with_capacity(s.len());
    let mut pending_sep = false;

    for ch in s.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_sep && !slug.is_empty() {
                slug.push('-');
            }
            pending_sep = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_sep = true;
        }
    }

    slug
}

/// Build the full candidate list for a product image slot.
///
/// The variant index only seeds the remote placeholder; local candidates
/// keep the same relative order for every variant.
pub fn candidates_for(product: &Product, size: ImageSize, variant: usize) -> Vec<String> {
    let slug = slugify(&product.name);
    let cat = slugify(&product.category);

    let mut candidates = Vec::new();

    // Per-product local images, every encoding over every slot
    for ext in ENCODINGS {
        for slot in 1..=PRODUCT_SLOTS {
            candidates.push(format!("assets/products/{}-{}.{}", slug, slot, ext));
        }
    }

    // Category-default local images
    for ext in ENCODINGS {
        for slot in 1..=DEFAULT_SLOTS {
            candidates.push(format!("assets/defaults/{}-{}.{}", cat, slot, ext));
        }
    }

    // Explicit URLs attached to the record, in their given order
    candidates.extend(product.images.iter().cloned());

    // Deterministic placeholder service, seeded by slug and variant
    candidates.push(format!(
        "https://picsum.photos/seed/{}-{}/{}/{}",
        slug, variant, size.w, size.h
    ));

    // Generic stock-photo query as the last remote resort
    candidates.push(format!(
        "https://source.unsplash.com/{}x{}/?{}",
        size.w,
        size.h,
        utf8_percent_encode(&product.category, QUERY_ESCAPE)
    ));

    candidates
}
