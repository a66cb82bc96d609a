/// Deep links, sharing, and the clipboard hand-off
///
/// A product's detail view is addressable by URL fragment (`product-<id>`).
/// Navigation events feed `apply_fragment`, which opens or closes the view.
/// Opening a view never writes the fragment; only the explicit share
/// action builds a link.

use thiserror::Error;

use crate::state::data::Catalog;

/// Fragment prefix for product detail links
const FRAGMENT_PREFIX: &str = "product-";

/// Which product detail view, if any, is currently open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewState {
    open: Option<u32>,
}

impl ViewState {
    pub fn open_product(&self) -> Option<u32> {
        self.open
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }
}

/// Parse a `product-<id>` fragment into a product id
pub fn parse_fragment(fragment: &str) -> Option<u32> {
    fragment.strip_prefix(FRAGMENT_PREFIX)?.parse().ok()
}

/// Apply a navigation event to the view state.
///
/// A fragment naming a known product opens its detail view. Anything else
/// (no fragment, an unrelated fragment, an unknown product id) closes
/// whatever view is open, so forward and backward navigation both stay in
/// sync with the address bar.
pub fn apply_fragment(fragment: Option<&str>, catalog: &Catalog, view: &mut ViewState) {
    match fragment.and_then(parse_fragment) {
        Some(id) if catalog.find(id).is_some() => view.open = Some(id),
        _ => view.open = None,
    }
}

/// Build the shareable link for a product
pub fn share_link(base: &str, id: u32) -> String {
    format!("{}#{}{}", base, FRAGMENT_PREFIX, id)
}

/// Errors from the host clipboard capability
#[derive(Debug, Error)]
#[error("clipboard write failed: {0}")]
pub struct ClipboardError(pub String);

/// Host clipboard capability. The primary write may suspend while the host
/// asks for permission; the synchronous path is the older fallback
/// mechanism.
pub trait Clipboard {
    async fn write(&mut self, text: &str) -> Result<(), ClipboardError>;
    fn write_sync(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// Copy text, falling back to the synchronous mechanism when the primary
/// write fails. A double failure is logged and swallowed; sharing is
/// best-effort, never a blocking error. Returns whether a copy landed.
pub async fn copy_text<C: Clipboard>(clipboard: &mut C, text: &str) -> bool {
    if clipboard.write(text).await.is_ok() {
        return true;
    }

    match clipboard.write_sync(text) {
        Ok(()) => true,
        Err(e) => {
            eprintln!("⚠️  Failed to copy text: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::Catalog;

    /// Clipboard double with independently failable paths
    struct FlakyClipboard {
        primary_works: bool,
        fallback_works: bool,
        copied: Vec<String>,
        fallback_used: bool,
    }

    impl FlakyClipboard {
        fn new(primary_works: bool, fallback_works: bool) -> Self {
            FlakyClipboard {
                primary_works,
                fallback_works,
                copied: Vec::new(),
                fallback_used: false,
            }
        }
    }

    impl Clipboard for FlakyClipboard {
        async fn write(&mut self, text: &str) -> Result<(), ClipboardError> {
            if self.primary_works {
                self.copied.push(text.to_string());
                Ok(())
            } else {
                Err(ClipboardError("permission denied".to_string()))
            }
        }

        fn write_sync(&mut self, text: &str) -> Result<(), ClipboardError> {
            self.fallback_used = true;
            if self.fallback_works {
                self.copied.push(text.to_string());
                Ok(())
            } else {
                Err(ClipboardError("no selection support".to_string()))
            }
        }
    }

    #[test]
    fn test_parse_fragment() {
        assert_eq!(parse_fragment("product-5"), Some(5));
        assert_eq!(parse_fragment("product-12"), Some(12));
        assert_eq!(parse_fragment("product-"), None);
        assert_eq!(parse_fragment("product-abc"), None);
        assert_eq!(parse_fragment("cart"), None);
    }

    #[test]
    fn test_share_link_format() {
        assert_eq!(
            share_link("https://shop.example/", 7),
            "https://shop.example/#product-7"
        );
    }

    #[test]
    fn test_known_fragment_opens_the_view() {
        let catalog = Catalog::load_embedded().unwrap();
        let mut view = ViewState::default();

        apply_fragment(Some("product-5"), &catalog, &mut view);
        assert_eq!(view.open_product(), Some(5));
    }

    #[test]
    fn test_navigating_back_to_no_fragment_closes_the_view() {
        let catalog = Catalog::load_embedded().unwrap();
        let mut view = ViewState::default();

        apply_fragment(Some("product-5"), &catalog, &mut view);
        assert!(view.is_open());

        apply_fragment(None, &catalog, &mut view);
        assert!(!view.is_open());
    }

    #[test]
    fn test_unknown_product_fragment_closes_an_open_view() {
        let catalog = Catalog::load_embedded().unwrap();
        let mut view = ViewState::default();

        apply_fragment(Some("product-3"), &catalog, &mut view);
        apply_fragment(Some("product-999"), &catalog, &mut view);
        assert!(!view.is_open());
    }

    #[test]
    fn test_unrelated_fragment_leaves_nothing_open() {
        let catalog = Catalog::load_embedded().unwrap();
        let mut view = ViewState::default();

        apply_fragment(Some("checkout"), &catalog, &mut view);
        assert!(!view.is_open());
    }

    #[test]
    fn test_forward_and_back_are_symmetric() {
        let catalog = Catalog::load_embedded().unwrap();
        let mut view = ViewState::default();

        // forward: open 2, then 9; back: 2 again, then closed
        apply_fragment(Some("product-2"), &catalog, &mut view);
        apply_fragment(Some("product-9"), &catalog, &mut view);
        assert_eq!(view.open_product(), Some(9));

        apply_fragment(Some("product-2"), &catalog, &mut view);
        assert_eq!(view.open_product(), Some(2));

        apply_fragment(None, &catalog, &mut view);
        assert!(!view.is_open());
    }

    #[tokio::test]
    async fn test_copy_uses_primary_when_it_works() {
        let mut clipboard = FlakyClipboard::new(true, true);
        assert!(copy_text(&mut clipboard, "https://shop.example/#product-1").await);
        assert!(!clipboard.fallback_used);
        assert_eq!(clipboard.copied.len(), 1);
    }

    #[tokio::test]
    async fn test_copy_falls_back_when_primary_fails() {
        let mut clipboard = FlakyClipboard::new(false, true);
        assert!(copy_text(&mut clipboard, "link").await);
        assert!(clipboard.fallback_used);
        assert_eq!(clipboard.copied, ["link"]);
    }

    #[tokio::test]
    async fn test_double_failure_is_swallowed() {
        let mut clipboard = FlakyClipboard::new(false, false);
        // Never panics, never errors out; just reports that nothing landed
        assert!(!copy_text(&mut clipboard, "link").await);
        assert!(clipboard.copied.is_empty());
    }
}
