//! Relationship resolution and annotation against the public API.

use sqldraw::relations::{load_metadata, Relationships, WILDCARD};
use sqldraw::schema::{Column, ColumnRef, Table};
use std::fs;
use tempfile::TempDir;

fn orders() -> Table {
    Table::new("orders")
        .with_column(Column::new("id", "INT8").primary_key())
        .with_column(Column::new("customer_id", "INT8"))
        .with_column(Column::new("device_id", "INT8"))
}

#[test]
fn test_table_entry_beats_wildcard() {
    let rel = Relationships::new()
        .with(WILDCARD, "owner_id", "users")
        .with("orders", "owner_id", "accounts");

    assert_eq!(rel.resolve("orders", "owner_id"), Some("accounts"));
    assert_eq!(rel.resolve("invoices", "owner_id"), Some("users"));
}

#[test]
fn test_wildcard_fallback() {
    let rel = Relationships::new().with(WILDCARD, "customer_id", "customers");
    assert_eq!(rel.resolve("orders", "customer_id"), Some("customers"));
    assert_eq!(rel.resolve("orders", "unknown"), None);
}

#[test]
fn test_self_reference_is_not_found() {
    let rel = Relationships::new().with(WILDCARD, "parent_id", "categories");
    assert_eq!(rel.resolve("categories", "parent_id"), None);
    assert_eq!(rel.resolve("products", "parent_id"), Some("categories"));
}

#[test]
fn test_wildcard_customer_scenario() {
    let rel = Relationships::new().with(WILDCARD, "customer_id", "customers");
    let mut table = orders();

    assert_eq!(rel.annotate(&mut table), 1);

    let column = table.get_column("customer_id").unwrap();
    assert!(column.is_foreign_key);
    assert_eq!(
        column.references,
        vec![ColumnRef::new("customers", "customer_id")]
    );
    assert_eq!(column.references[0].to_string(), "customers.customer_id");
}

#[test]
fn test_self_reference_scenario_does_not_fall_through() {
    let rel = Relationships::new()
        .with(WILDCARD, "device_id", "devices")
        .with("orders", "device_id", "orders");
    let mut table = orders();

    assert_eq!(rel.annotate(&mut table), 0);
    let column = table.get_column("device_id").unwrap();
    assert!(!column.is_foreign_key);
    assert!(column.references.is_empty());
}

#[test]
fn test_annotate_twice_is_stable() {
    let rel = Relationships::new().with(WILDCARD, "customer_id", "customers");
    let mut table = orders();
    rel.annotate(&mut table);
    let once = table.clone();

    assert_eq!(rel.annotate(&mut table), 0);
    assert_eq!(table, once);
}

#[test]
fn test_load_metadata_json_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("schema.json");
    fs::write(
        &path,
        r#"{"*": {"customer_id": "customers"}, "orders": {"device_id": "devices"}}"#,
    )
    .unwrap();

    let rel = load_metadata(Some(&path)).unwrap();
    assert_eq!(rel.len(), 2);
    assert_eq!(rel.resolve("orders", "device_id"), Some("devices"));
    assert_eq!(rel.resolve("invoices", "customer_id"), Some("customers"));
}

#[test]
fn test_load_metadata_yaml_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("relations.yaml");
    fs::write(&path, "\"*\":\n  customer_id: customers\n").unwrap();

    let rel = load_metadata(Some(&path)).unwrap();
    assert_eq!(rel.resolve("orders", "customer_id"), Some("customers"));
}

#[test]
fn test_load_metadata_missing_explicit_file_fails() {
    let dir = TempDir::new().unwrap();
    assert!(load_metadata(Some(&dir.path().join("nope.json"))).is_err());
}

#[test]
fn test_load_metadata_malformed_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("schema.json");
    fs::write(&path, "{\"*\": [1, 2]}").unwrap();
    assert!(load_metadata(Some(&path)).is_err());
}
