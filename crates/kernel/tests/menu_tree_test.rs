#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Integration tests for menu tree construction and href resolution.

use uuid::Uuid;
use waypoint_kernel::Config;
use waypoint_kernel::menu::{build_menu_tree, flatten_menu_tree, resolve_menu_href, select_menu};
use waypoint_kernel::models::MenuItem;

fn item(menu: &str, title: &str, order: i32, parent_id: Option<Uuid>) -> MenuItem {
    let mut item = MenuItem::new(menu, title, order);
    item.parent_id = parent_id;
    item
}

/// A realistic main menu: nested sections, sparse order values, one orphan
/// left behind by a partial fetch.
fn main_menu_fixture() -> Vec<MenuItem> {
    let home = item("main", "Home", 0, None);
    let mut docs = item("main", "Docs", 10, None);
    docs.slug = Some("docs".to_string());
    let mut guide = item("main", "Guide", 20, Some(docs.id));
    guide.slug = Some("docs/guide".to_string());
    let mut reference = item("main", "Reference", 5, Some(docs.id));
    reference.slug = Some("docs/reference".to_string());
    let mut community = item("main", "Community", 40, None);
    community.url = Some("https://forum.example.com:443/".to_string());
    // Parent lives in another menu that was not fetched.
    let orphan = item("main", "Dangling", 30, Some(Uuid::now_v7()));

    vec![guide, community, home, orphan, docs, reference]
}

#[test]
fn test_build_orders_every_level() {
    let tree = build_menu_tree(main_menu_fixture());

    let titles: Vec<&str> = tree.iter().map(|n| n.title.as_str()).collect();
    assert_eq!(titles, vec!["Home", "Docs", "Dangling", "Community"]);

    // Every level's order field is its array index.
    for (i, node) in tree.iter().enumerate() {
        assert_eq!(node.order, i as i32);
    }

    let docs = &tree[1];
    let children: Vec<&str> = docs.children.iter().map(|n| n.title.as_str()).collect();
    assert_eq!(children, vec!["Reference", "Guide"]);
    assert_eq!(docs.children[0].order, 0);
    assert_eq!(docs.children[1].order, 1);
}

#[test]
fn test_default_menu_selected_from_mixed_rows() {
    let config = Config::default();

    let mut rows = main_menu_fixture();
    rows.push(item("footer", "Imprint", 0, None));
    rows.push(item("footer", "Contact", 1, None));

    let tree = build_menu_tree(select_menu(rows, &config.default_menu));

    assert_eq!(tree.len(), 4);
    assert!(tree.iter().all(|n| n.menu == "main"));
}

#[test]
fn test_orphan_appears_as_root() {
    let tree = build_menu_tree(main_menu_fixture());
    assert!(tree.iter().any(|n| n.title == "Dangling"));
}

#[test]
fn test_round_trip_law() {
    let first = build_menu_tree(main_menu_fixture());
    let flat = flatten_menu_tree(&first);
    let rebuilt = build_menu_tree(flat.into_iter().map(MenuItem::from).collect());

    assert_eq!(first, rebuilt);
}

#[test]
fn test_flatten_supports_reorder_persistence() {
    let mut tree = build_menu_tree(main_menu_fixture());

    // Simulate a drag: move the last root to the front.
    let moved = tree.pop().unwrap();
    tree.insert(0, moved);

    // Flattened rows rebuild the edited tree, with order renumbered.
    let rebuilt = build_menu_tree(
        flatten_menu_tree(&tree)
            .into_iter()
            .map(MenuItem::from)
            .collect(),
    );
    let titles: Vec<&str> = rebuilt.iter().map(|n| n.title.as_str()).collect();
    assert_eq!(titles[0], "Community");
    assert_eq!(rebuilt[0].order, 0);
}

#[test]
fn test_rows_from_json_to_tree() {
    let json = r#"[
        {"id": "018f0000-0000-7000-8000-000000000001", "menu": "footer", "title": "Legal", "order": 1},
        {"id": "018f0000-0000-7000-8000-000000000002", "menu": "footer", "title": "Privacy",
         "slug": "privacy", "order": 0, "parent_id": "018f0000-0000-7000-8000-000000000001"},
        {"id": "junk", "menu": "footer", "title": "Broken"}
    ]"#;

    let tree = build_menu_tree(MenuItem::parse_rows(json));

    assert_eq!(tree.len(), 1);
    assert_eq!(tree[0].title, "Legal");
    assert_eq!(tree[0].children.len(), 1);
    assert_eq!(tree[0].children[0].href(), "/privacy");
}

#[test]
fn test_node_hrefs_are_sanitized() {
    let tree = build_menu_tree(main_menu_fixture());

    let community = tree.iter().find(|n| n.title == "Community").unwrap();
    assert_eq!(community.href(), "https://forum.example.com/");

    let home = tree.iter().find(|n| n.title == "Home").unwrap();
    assert_eq!(home.href(), "#");
}

#[test]
fn test_href_policy_matrix() {
    // Absolute URL normalization drops default ports.
    assert_eq!(
        resolve_menu_href(None, Some("https://example.com:443/a")),
        "https://example.com/a"
    );
    // Traversal and encoded injection in slugs.
    assert_eq!(resolve_menu_href(Some("../../etc/passwd"), None), "#");
    // Scheme allow-list.
    assert_eq!(resolve_menu_href(None, Some("javascript:alert(1)")), "#");
    // Plain slug.
    assert_eq!(resolve_menu_href(Some("about"), None), "/about");
    // Protocol-relative is neither root-relative nor parseable.
    assert_eq!(resolve_menu_href(None, Some("//evil.com")), "#");
}
