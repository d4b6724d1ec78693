//! Menu tree construction and flattening.
//!
//! Converts flat menu item rows into a hierarchical tree with deterministic
//! sibling ordering, and back again for persisting a reordered tree. Both
//! directions are pure functions over their inputs; the tree is a derived,
//! request-scoped value that is rebuilt on every read and never cached here.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::href::resolve_menu_href;
use crate::models::MenuItem;

/// A menu item with its resolved children, ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuNode {
    /// Unique identifier of the underlying item.
    pub id: Uuid,

    /// Menu machine name.
    pub menu: String,

    /// Display label.
    pub title: String,

    /// Optional internal path fragment.
    #[serde(default)]
    pub slug: Option<String>,

    /// Optional external or absolute target.
    #[serde(default)]
    pub url: Option<String>,

    /// Optional icon identifier.
    #[serde(default)]
    pub icon: Option<String>,

    /// Zero-based index among siblings, rewritten during tree construction.
    pub order: i32,

    /// Optional reference to a content page.
    #[serde(default)]
    pub page_id: Option<Uuid>,

    /// Child nodes in sibling order.
    #[serde(default)]
    pub children: Vec<MenuNode>,
}

impl MenuNode {
    /// Resolve this node's navigable target.
    ///
    /// Returns `"#"` when the node has no safe destination; callers render
    /// that as a disabled link rather than omitting the entry.
    pub fn href(&self) -> String {
        resolve_menu_href(self.slug.as_deref(), self.url.as_deref())
    }
}

/// A flattened tree node carrying its computed depth, suitable for
/// persisting a reordered tree back into flat storage rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatMenuEntry {
    pub id: Uuid,
    pub menu: String,
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    /// Zero-based index among siblings.
    pub order: i32,
    /// Parent in the flattened tree; `None` for roots.
    #[serde(default)]
    pub parent_id: Option<Uuid>,
    #[serde(default)]
    pub page_id: Option<Uuid>,
    /// Distance from the root sequence (roots are depth 0).
    pub depth: u32,
}

impl From<FlatMenuEntry> for MenuItem {
    fn from(entry: FlatMenuEntry) -> Self {
        Self {
            id: entry.id,
            menu: entry.menu,
            title: entry.title,
            slug: entry.slug,
            url: entry.url,
            icon: entry.icon,
            order: entry.order,
            parent_id: entry.parent_id,
            page_id: entry.page_id,
        }
    }
}

/// Select the rows belonging to a single named menu.
///
/// Trees are always built from one menu's rows: parent references never
/// resolve across menus, so a mixed fetch must be narrowed first. The menu
/// name typically comes from [`Config::default_menu`](crate::Config).
pub fn select_menu(records: Vec<MenuItem>, menu: &str) -> Vec<MenuItem> {
    records.into_iter().filter(|r| r.menu == menu).collect()
}

/// Build a menu tree from flat item rows.
///
/// Rows are stably sorted by `order`, grouped under their parents (parent
/// lookups resolve only within this call's row set), and assembled
/// recursively. Every sibling list is then re-sorted and each node's `order`
/// rewritten to its zero-based index, so the output is deterministic for a
/// fixed input order.
///
/// Rows whose `parent_id` is missing from the input set become roots; a row
/// whose `parent_id` is its own id is also kept as a root. Cycles of two or
/// more rows are unreachable from any root and are dropped — storage writes
/// are expected to reject cyclic parents upstream.
pub fn build_menu_tree(mut records: Vec<MenuItem>) -> Vec<MenuNode> {
    records.sort_by_key(|r| r.order);

    let ids: HashSet<Uuid> = records.iter().map(|r| r.id).collect();

    // Group children under their parent, preserving the sorted order.
    let mut children: HashMap<Uuid, Vec<MenuItem>> = HashMap::new();
    let mut roots: Vec<MenuItem> = Vec::new();

    for record in records {
        let parent = record
            .parent_id
            .filter(|p| *p != record.id && ids.contains(p));
        match parent {
            Some(parent) => children.entry(parent).or_default().push(record),
            None => roots.push(record),
        }
    }

    let mut tree: Vec<MenuNode> = roots
        .into_iter()
        .map(|record| assemble(record, &mut children))
        .collect();

    renumber(&mut tree);
    tree
}

/// Recursively wrap a record and claim its children from the grouping map.
fn assemble(record: MenuItem, children: &mut HashMap<Uuid, Vec<MenuItem>>) -> MenuNode {
    let own = children.remove(&record.id).unwrap_or_default();
    let own = own
        .into_iter()
        .map(|child| assemble(child, children))
        .collect();

    MenuNode {
        id: record.id,
        menu: record.menu,
        title: record.title,
        slug: record.slug,
        url: record.url,
        icon: record.icon,
        order: record.order,
        page_id: record.page_id,
        children: own,
    }
}

/// Stable-sort every sibling list by `order`, then overwrite `order` with
/// the zero-based index. Input order values only establish relative rank.
fn renumber(nodes: &mut [MenuNode]) {
    nodes.sort_by_key(|n| n.order);
    for (index, node) in nodes.iter_mut().enumerate() {
        node.order = index as i32;
        renumber(&mut node.children);
    }
}

/// Flatten a menu tree into storable rows, in pre-order.
///
/// Each entry carries its computed depth (roots are 0), its resolved
/// `parent_id`, and an `order` taken from the node's position among its
/// siblings — the position is authoritative, so a tree reordered in an
/// editing UI persists correctly even before anyone rewrites the `order`
/// fields. Feeding the result back through [`build_menu_tree`]
/// reconstructs a structurally identical tree.
pub fn flatten_menu_tree(tree: &[MenuNode]) -> Vec<FlatMenuEntry> {
    let mut entries = Vec::new();
    walk(tree, 0, None, &mut entries);
    entries
}

fn walk(nodes: &[MenuNode], depth: u32, parent_id: Option<Uuid>, out: &mut Vec<FlatMenuEntry>) {
    for (index, node) in nodes.iter().enumerate() {
        out.push(FlatMenuEntry {
            id: node.id,
            menu: node.menu.clone(),
            title: node.title.clone(),
            slug: node.slug.clone(),
            url: node.url.clone(),
            icon: node.icon.clone(),
            order: index as i32,
            parent_id,
            page_id: node.page_id,
            depth,
        });
        walk(&node.children, depth + 1, Some(node.id), out);
    }
}
