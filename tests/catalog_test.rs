//! Tests for the TOML catalog and the in-memory repository

use std::fs;

use tempfile::TempDir;

use grouptree::domain::HierarchyRow;
use grouptree::infrastructure::traits::GroupRepository;
use grouptree::infrastructure::{Catalog, InfraError};

const CATALOG: &str = r#"
[[group]]
id = "g-health"
name = "health"
title = "Health"

[[group]]
id = "g-district-b"
name = "district-b"
title = "District B"
parent = "health"

[[group]]
id = "g-district-a"
name = "district-a"
title = "District A"
parent = "g-health"

[[group]]
id = "g-clinic"
name = "clinic-x"
parent = "district-a"

[[group]]
id = "g-ministry"
name = "ministry"
title = "Ministry"
type = "organization"

[[group]]
id = "g-office"
name = "office"
title = "Office"
type = "organization"
parent = "ministry"

[[package]]
name = "clinic-locations"
groups = ["district-a", "clinic-x"]

[[package]]
name = "hospital-beds"
groups = ["health", "g-district-a", "district-a"]

[[package]]
name = "budget"
groups = ["ministry"]
"#;

fn catalog() -> Catalog {
    Catalog::parse(CATALOG).unwrap()
}

// ============================================================
// Loading
// ============================================================

#[test]
fn given_catalog_file_when_loading_then_counts_direct_packages_per_name() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("catalog.toml");
    fs::write(&path, CATALOG).unwrap();

    let catalog = Catalog::load(&path).unwrap();

    assert_eq!(catalog.repository.groups().len(), 6);
    // hospital-beds lists district-a twice (by id and by name), counted once
    assert_eq!(catalog.pkg_count.get("district-a"), 2);
    assert_eq!(catalog.pkg_count.get("health"), 1);
    assert_eq!(catalog.pkg_count.get("clinic-x"), 1);
    assert_eq!(catalog.pkg_count.get("ministry"), 1);
    assert_eq!(catalog.pkg_count.get("district-b"), 0);
}

#[test]
fn given_group_without_title_or_type_when_loading_then_uses_name_and_default_type() {
    let catalog = catalog();
    let clinic = catalog.repository.get("g-clinic").unwrap();
    assert_eq!(clinic.title, "clinic-x");
    assert_eq!(clinic.group_type, "group");
}

#[test]
fn given_missing_file_when_loading_then_io_error() {
    let dir = TempDir::new().unwrap();
    let err = Catalog::load(&dir.path().join("missing.toml")).unwrap_err();
    assert!(matches!(err, InfraError::Io { .. }));
}

#[test]
fn given_unknown_parent_when_loading_then_catalog_error() {
    let err = Catalog::parse(
        r#"
[[group]]
id = "a"
name = "a"
parent = "ghost"
"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("unknown parent ghost"));
}

#[test]
fn given_cycle_when_loading_then_catalog_error() {
    let err = Catalog::parse(
        r#"
[[group]]
id = "a"
name = "a"
parent = "b"

[[group]]
id = "b"
name = "b"
parent = "a"
"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("cycle"));
}

#[test]
fn given_duplicate_name_when_loading_then_catalog_error() {
    let err = Catalog::parse(
        r#"
[[group]]
id = "a"
name = "same"

[[group]]
id = "b"
name = "same"
"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("duplicate group name: same"));
}

#[test]
fn given_package_in_unknown_group_when_loading_then_catalog_error() {
    let err = Catalog::parse(
        r#"
[[package]]
name = "orphan"
groups = ["nowhere"]
"#,
    )
    .unwrap_err();
    assert!(matches!(err, InfraError::Catalog { .. }));
}

// ============================================================
// Repository queries
// ============================================================

#[test]
fn given_name_or_id_when_resolving_then_finds_group() {
    let repo = catalog().repository;
    assert_eq!(repo.resolve("g-health").unwrap().unwrap().name, "health");
    assert_eq!(repo.resolve("health").unwrap().unwrap().id, "g-health");
    assert!(repo.resolve("nope").unwrap().is_none());
}

#[test]
fn given_root_when_listing_hierarchy_then_parents_precede_children() {
    let repo = catalog().repository;
    let health = repo.resolve("health").unwrap().unwrap();

    let rows = repo.children_group_hierarchy(&health, "group").unwrap();

    let expected: Vec<HierarchyRow> = vec![
        ("g-district-b", "district-b", "District B", "g-health").into(),
        ("g-district-a", "district-a", "District A", "g-health").into(),
        ("g-clinic", "clinic-x", "clinic-x", "g-district-a").into(),
    ];
    assert_eq!(rows, expected);
}

#[test]
fn given_other_type_when_listing_hierarchy_then_empty() {
    let repo = catalog().repository;
    let health = repo.resolve("health").unwrap().unwrap();
    assert!(repo
        .children_group_hierarchy(&health, "organization")
        .unwrap()
        .is_empty());
}

#[test]
fn given_grandchild_when_getting_parents_then_root_first() {
    let repo = catalog().repository;
    let clinic = repo.resolve("clinic-x").unwrap().unwrap();

    let parents = repo.parent_group_hierarchy(&clinic, "group").unwrap();

    let names: Vec<&str> = parents.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["health", "district-a"]);
}

#[test]
fn given_root_when_getting_parents_then_empty() {
    let repo = catalog().repository;
    let health = repo.resolve("health").unwrap().unwrap();
    assert!(repo.parent_group_hierarchy(&health, "group").unwrap().is_empty());
}

#[test]
fn given_type_when_listing_top_groups_then_only_parentless_of_that_type() {
    let repo = catalog().repository;

    let groups = repo.top_groups("group").unwrap();
    let orgs = repo.top_groups("organization").unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].name, "health");
    assert_eq!(orgs[0].name, "ministry");
}

#[test]
fn given_parent_when_listing_children_then_storage_order() {
    let repo = catalog().repository;
    let health = repo.resolve("health").unwrap().unwrap();

    let children = repo.children_groups(&health, "group").unwrap();

    let names: Vec<&str> = children.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["district-b", "district-a"]);
}
