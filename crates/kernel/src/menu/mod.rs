//! Menu system for navigation structure.
//!
//! Flat menu item rows come in from the persistence layer; this module
//! provides:
//! - Tree construction with deterministic sibling ordering
//! - Flattening of an edited tree back into storable rows
//! - Sanitization of each entry's navigable target

mod href;
mod tree;

pub use href::resolve_menu_href;
pub use tree::{FlatMenuEntry, MenuNode, build_menu_tree, flatten_menu_tree, select_menu};
