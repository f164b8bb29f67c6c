// crates/vendor-metrics-store-sqlite/src/lib.rs
// ============================================================================
// Module: SQLite Vendor Store
// Description: Durable VendorStore backend using SQLite.
// Purpose: Provide production persistence for vendors, orders, and history.
// Dependencies: vendor-metrics-core, rusqlite
// ============================================================================

//! ## Overview
//! This crate provides a SQLite-backed [`VendorStore`] implementation with
//! one table per record kind and foreign keys that cascade vendor deletion.
//! Each [`VendorStore::transact`] call maps to one `SQLite` transaction.
//!
//! [`VendorStore`]: vendor_metrics_core::VendorStore
//! [`VendorStore::transact`]: vendor_metrics_core::VendorStore::transact

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use store::SCHEMA_VERSION;
pub use store::SqliteStoreConfig;
pub use store::SqliteStoreError;
pub use store::SqliteStoreMode;
pub use store::SqliteSyncMode;
pub use store::SqliteVendorStore;
