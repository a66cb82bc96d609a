use std::path::PathBuf;
use std::process::ExitCode;

// Declare the application modules
mod format;
mod media;
mod share;
mod state;

use format::{format_inr, stars};
use media::candidates::{candidates_for, CARD_SIZE, THUMB_SIZE};
use media::resolver::{resolve, LoadOutcome, ResolvedImage, ResourceLoader};
use share::{apply_fragment, copy_text, share_link, Clipboard, ClipboardError, ViewState};
use state::data::{Catalog, Product};
use state::favorites::{Favorites, SqliteKv};
use state::query::{filter_and_sort, QueryState, SortKey};

/// Parsed command-line input for the headless driver
struct CliArgs {
    /// Alternate dataset path (defaults to the bundled products)
    data: Option<PathBuf>,
    /// Toggle a product id in the favorites set
    fav: Option<u32>,
    /// Copy a product's share link
    share: Option<u32>,
    /// Open a detail view by URL fragment (e.g. "product-5")
    open: Option<String>,
    /// Sort order name ("price-asc", "name-desc", ...)
    sort: Option<String>,
    /// Remaining words form the free-text search query
    query: Vec<String>,
}

/// Minimal flag parsing; anything unflagged is search text
fn parse_args() -> CliArgs {
    let mut parsed = CliArgs {
        data: None,
        fav: None,
        share: None,
        open: None,
        sort: None,
        query: Vec::new(),
    };

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--data" => parsed.data = args.next().map(PathBuf::from),
            "--fav" => parsed.fav = args.next().and_then(|v| v.parse().ok()),
            "--share" => parsed.share = args.next().and_then(|v| v.parse().ok()),
            "--open" => parsed.open = args.next(),
            "--sort" => parsed.sort = args.next(),
            _ => parsed.query.push(arg),
        }
    }

    parsed
}

/// Resource loader for the headless driver.
///
/// Local candidates resolve against the working directory; remote URIs are
/// never fetched here, so they always signal failure and the listing falls
/// through to the initials badge unless assets exist on disk.
struct FsProbeLoader;

impl ResourceLoader for FsProbeLoader {
    async fn load(&self, uri: &str) -> LoadOutcome {
        if uri.starts_with("http://") || uri.starts_with("https://") {
            return LoadOutcome::Failure;
        }

        match tokio::fs::try_exists(uri).await {
            Ok(true) => LoadOutcome::Success,
            _ => LoadOutcome::Failure,
        }
    }
}

/// Clipboard for a terminal session: there is no system clipboard to hand
/// the text to, so the primary write fails and the fallback prints the text
/// for manual selection.
struct TerminalClipboard;

impl Clipboard for TerminalClipboard {
    async fn write(&mut self, _text: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError("no system clipboard in a terminal session".to_string()))
    }

    fn write_sync(&mut self, text: &str) -> Result<(), ClipboardError> {
        println!("🔗 {}", text);
        Ok(())
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = parse_args();

    // Load the dataset first: the engine cannot render anything without
    // products, so an empty or unreadable dataset is fatal.
    let catalog = match &args.data {
        Some(path) => Catalog::load_from_path(path),
        None => Catalog::load_embedded(),
    };
    let catalog = match catalog {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("❌ Couldn't load products: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Favorites store; without its database the app cannot keep hearts
    // across sessions
    let kv = SqliteKv::new()
        .expect("Failed to initialize favorites store. Check permissions and disk space.");
    let mut favorites = Favorites::load(kv);

    println!(
        "🛍️  Bazaar initialized with {} products across {} categories ({} favorites)",
        catalog.len(),
        catalog.categories().len(),
        favorites.len()
    );

    if let Some(id) = args.fav {
        let now_on = favorites.toggle(id);
        println!("{} Product {} {}", if now_on { "❤" } else { "♡" }, id, if now_on { "added to favorites" } else { "removed from favorites" });
    }

    if let Some(id) = args.share {
        let link = share_link("https://bazaar.example/", id);
        let mut clipboard = TerminalClipboard;
        if copy_text(&mut clipboard, &link).await {
            println!("✅ Product link copied");
        }
    }

    // Deep link: a fragment naming a known product opens its detail view
    if let Some(fragment) = args.open.as_deref() {
        let mut view = ViewState::default();
        apply_fragment(Some(fragment), &catalog, &mut view);

        match view.open_product().and_then(|id| catalog.find(id)) {
            Some(product) => {
                print_detail_view(product).await;
                return ExitCode::SUCCESS;
            }
            None => {
                eprintln!("⚠️  No product at #{}", fragment);
                return ExitCode::FAILURE;
            }
        }
    }

    // Build the query snapshot and run the pipeline
    let mut query = QueryState::for_catalog(&catalog);
    if !args.query.is_empty() {
        query.query = args.query.join(" ");
    }
    if let Some(sort) = &args.sort {
        query.sort = SortKey::parse(sort);
    }

    let results = filter_and_sort(catalog.products(), &query);
    if results.is_empty() {
        println!("No products match your criteria. Try adjusting your filters.");
        return ExitCode::SUCCESS;
    }

    let loader = FsProbeLoader;
    for product in &results {
        let art = match resolve(&loader, candidates_for(product, CARD_SIZE, 0), &product.name).await
        {
            ResolvedImage::Source(source) => source,
            ResolvedImage::Fallback(initials) => format!("[{}]", initials),
        };

        let heart = if favorites.contains(product.id) { "❤" } else { "♡" };
        println!(
            "{} {:<44} {:<20} {:>8}  {}  {:<4} {}",
            heart,
            product.name,
            product.category,
            format_inr(product.price),
            stars(product.rating),
            product.badge.label(),
            art
        );
    }
    println!(
        "{} product{}",
        results.len(),
        if results.len() != 1 { "s" } else { "" }
    );

    ExitCode::SUCCESS
}

/// Render one product the way the modal does: main image, description,
/// tags, and a small gallery of variant thumbnails
async fn print_detail_view(product: &Product) {
    let loader = FsProbeLoader;

    let main_image = match resolve(
        &loader,
        candidates_for(product, CARD_SIZE, 0),
        &product.name,
    )
    .await
    {
        ResolvedImage::Source(source) => source,
        ResolvedImage::Fallback(initials) => format!("[{}]", initials),
    };

    println!();
    println!("{}", product.name);
    println!("{}  {}", stars(product.rating), format_inr(product.price));
    println!("{}", product.description);
    println!("Tags: {}", product.tags.join(", "));
    println!("Image: {}", main_image);

    // Gallery thumbnails, one per variant slot
    for variant in 0..3 {
        let thumb = match resolve(
            &loader,
            candidates_for(product, THUMB_SIZE, variant),
            &product.name,
        )
        .await
        {
            ResolvedImage::Source(source) => source,
            ResolvedImage::Fallback(initials) => format!("[{}]", initials),
        };
        println!("  view {}: {}", variant + 1, thumb);
    }
}
