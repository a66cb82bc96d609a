/// Product imagery module
///
/// This module handles:
/// - Deriving the ordered list of image sources to try for a product
/// - Walking that list until one source loads
/// - Degrading to an initials badge when every source fails

pub mod candidates;
pub mod resolver;
