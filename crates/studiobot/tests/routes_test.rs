//! Integration tests for the studio route table
//!
//! Run with: cargo test -p studiobot --test routes_test

use pretty_assertions::assert_eq;
use studiobot::routes::{build_router, priority};

fn winner(data: &str) -> Option<(String, i32)> {
    let router = build_router().unwrap();
    router.resolve(data).map(|r| (r.pattern().to_string(), r.priority()))
}

#[test]
fn test_route_table_in_priority_order() {
    let router = build_router().unwrap();
    let priorities: Vec<i32> = router.routes().iter().map(|r| r.priority()).collect();

    let mut sorted = priorities.clone();
    sorted.sort();
    assert_eq!(priorities, sorted);
    assert_eq!(router.list_routes().len(), router.len());
}

#[test]
fn test_project_details_beats_catch_all() {
    assert_eq!(
        winner("project_details_42"),
        Some((r"^project_details_\d{1,18}$".to_string(), priority::SPECIFIC))
    );
    assert_eq!(
        winner("project_revisions_42"),
        Some((r"^project_revisions_\d{1,18}$".to_string(), priority::PROJECT_REVISIONS))
    );
    assert_eq!(
        winner("project_files_42"),
        Some(("^project_".to_string(), priority::PROJECT_CATCH_ALL))
    );
    assert_eq!(
        winner("project_details_abc"),
        Some(("^project_".to_string(), priority::PROJECT_CATCH_ALL))
    );
}

#[test]
fn test_ids_wider_than_i64_go_to_catch_all() {
    let data = format!("project_details_{}", "9".repeat(20));
    assert!(data.len() <= 64);

    assert_eq!(winner(&data), Some(("^project_".to_string(), priority::PROJECT_CATCH_ALL)));
    assert_eq!(
        winner(&format!("project_revisions_{}", "1".repeat(19))),
        Some(("^project_".to_string(), priority::PROJECT_CATCH_ALL))
    );
}

#[test]
fn test_sections_and_menus_resolve() {
    assert_eq!(winner("main_menu").map(|w| w.1), Some(priority::SPECIFIC));
    assert_eq!(winner("back_to_main").map(|w| w.1), Some(priority::SPECIFIC));
    assert_eq!(winner("noop").map(|w| w.1), Some(priority::SYSTEM));
    assert_eq!(winner("hosting_pay_3").map(|w| w.0), Some("^hosting_".to_string()));
    assert_eq!(winner("finance_income_2024_05").map(|w| w.0), Some("^finance_".to_string()));
    assert_eq!(winner("admin_project_42").map(|w| w.0), Some("^admin_".to_string()));
    assert_eq!(winner("projects_page_3").map(|w| w.1), Some(priority::PROJECT_LIST));
}

#[test]
fn test_unknown_identifiers_fall_through() {
    assert_eq!(winner("revision_new_42"), None);
    assert_eq!(winner("main_menu_old"), None);
    assert_eq!(winner("chat_open_42"), None);
    assert_eq!(winner(""), None);
}

#[test]
fn test_only_intended_overlaps() {
    let router = build_router().unwrap();
    let conflicts = router.validate_all_patterns();

    let samples: Vec<&str> = conflicts.iter().map(|c| c.sample.as_str()).collect();
    assert_eq!(samples, vec!["project_details_42", "project_revisions_42", "project_list"]);
    for conflict in &conflicts {
        assert_eq!(conflict.patterns.last().map(String::as_str), Some("^project_"));
        assert_ne!(conflict.winner(), "^project_");
    }
}
