// crates/vendor-metrics-store-sqlite/src/store.rs
// ============================================================================
// Module: SQLite Vendor Store
// Description: Durable VendorStore backed by SQLite.
// Purpose: Persist vendors, purchase orders, and performance history.
// Dependencies: vendor-metrics-core, rusqlite, serde, serde_json, thiserror, time
// ============================================================================

//! ## Overview
//! This module implements a durable [`VendorStore`] using `SQLite`. Datetimes
//! are stored as unix microseconds, purchase order items as JSON text.
//! Foreign keys cascade vendor deletion to orders and history. Rows that fail
//! to decode are reported as corruption rather than skipped.

// ============================================================================//
// SECTION: Imports
// ============================================================================//

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use rusqlite::Connection;
use rusqlite::ErrorCode;
use rusqlite::OpenFlags;
use rusqlite::OptionalExtension;
use rusqlite::Row;
use rusqlite::Transaction;
use rusqlite::TransactionBehavior;
use rusqlite::params;
use serde::Deserialize;
use serde_json::Map;
use serde_json::Value;
use thiserror::Error;
use time::OffsetDateTime;
use vendor_metrics_core::HistoricalPerformance;
use vendor_metrics_core::PerformanceMetrics;
use vendor_metrics_core::PoNumber;
use vendor_metrics_core::PurchaseOrder;
use vendor_metrics_core::PurchaseOrderStatus;
use vendor_metrics_core::StoreError;
use vendor_metrics_core::StoreTransaction;
use vendor_metrics_core::TransactionWork;
use vendor_metrics_core::Vendor;
use vendor_metrics_core::VendorCode;
use vendor_metrics_core::VendorStore;
use vendor_metrics_core::time::from_unix_micros;
use vendor_metrics_core::time::to_unix_micros;

// ============================================================================//
// SECTION: Constants
// ============================================================================//

/// `SQLite` schema version for the store.
pub const SCHEMA_VERSION: i64 = 1;
/// Default busy timeout (ms).
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;

/// Vendor columns in record order.
const VENDOR_COLUMNS: &str = "vendor_code, name, contact_details, address, \
                              on_time_delivery_rate, quality_rating_avg, average_response_time, \
                              fulfillment_rate";
/// Purchase order columns in record order.
const ORDER_COLUMNS: &str = "po_number, vendor_code, order_date, delivery_date, items_json, \
                             quantity, status, quality_rating, issue_date, acknowledgement_date";
/// History columns in record order.
const HISTORY_COLUMNS: &str = "vendor_code, recorded_at, on_time_delivery_rate, \
                               quality_rating_avg, average_response_time, fulfillment_rate";

// ============================================================================//
// SECTION: Config
// ============================================================================//

/// `SQLite` journal mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteStoreMode {
    /// WAL journal mode (recommended).
    #[default]
    Wal,
    /// Delete journal mode (legacy).
    Delete,
}

impl SqliteStoreMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Wal => "wal",
            Self::Delete => "delete",
        }
    }
}

/// `SQLite` sync mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteSyncMode {
    /// Full synchronous mode (safest).
    #[default]
    Full,
    /// Normal synchronous mode (balanced).
    Normal,
}

impl SqliteSyncMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Normal => "normal",
        }
    }
}

/// Configuration for the `SQLite` vendor store.
#[derive(Debug, Clone, Deserialize)]
pub struct SqliteStoreConfig {
    /// Path to the `SQLite` database file.
    pub path: PathBuf,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` sync mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

impl SqliteStoreConfig {
    /// Returns a config for `path` with default pragmas.
    #[must_use]
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
        }
    }
}

/// Returns the default busy timeout for `SQLite` connections.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

// ============================================================================//
// SECTION: Errors
// ============================================================================//

/// `SQLite` store errors.
#[derive(Debug, Error)]
pub enum SqliteStoreError {
    /// Store I/O error.
    #[error("sqlite store io error: {0}")]
    Io(String),
    /// `SQLite` engine error.
    #[error("sqlite store db error: {0}")]
    Db(String),
    /// Stored row failed to decode.
    #[error("sqlite store corruption: {0}")]
    Corrupt(String),
    /// Store schema version mismatch.
    #[error("sqlite store version mismatch: {0}")]
    VersionMismatch(String),
    /// Invalid store data.
    #[error("sqlite store invalid data: {0}")]
    Invalid(String),
    /// Primary key, foreign key, or check constraint violated.
    #[error("sqlite store constraint violation: {0}")]
    Conflict(String),
}

impl From<SqliteStoreError> for StoreError {
    fn from(error: SqliteStoreError) -> Self {
        match error {
            SqliteStoreError::Io(message) => Self::Io(message),
            SqliteStoreError::Db(message) => Self::Store(message),
            SqliteStoreError::Corrupt(message) => Self::Corrupt(message),
            SqliteStoreError::VersionMismatch(message) => Self::VersionMismatch(message),
            SqliteStoreError::Invalid(message) => Self::Invalid(message),
            SqliteStoreError::Conflict(message) => Self::Conflict(message),
        }
    }
}

/// Classifies a rusqlite error, separating constraint violations.
fn db_error(err: rusqlite::Error) -> SqliteStoreError {
    if let rusqlite::Error::SqliteFailure(failure, _) = &err
        && failure.code == ErrorCode::ConstraintViolation
    {
        return SqliteStoreError::Conflict(err.to_string());
    }
    SqliteStoreError::Db(err.to_string())
}

// ============================================================================//
// SECTION: Store
// ============================================================================//

/// `SQLite`-backed vendor store.
#[derive(Clone)]
pub struct SqliteVendorStore {
    /// Shared `SQLite` connection guarded by a mutex.
    connection: Arc<Mutex<Connection>>,
}

impl SqliteVendorStore {
    /// Opens an `SQLite`-backed vendor store, creating the schema if needed.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the database cannot be opened or
    /// initialized, or when it carries an unsupported schema version.
    pub fn new(config: &SqliteStoreConfig) -> Result<Self, SqliteStoreError> {
        validate_store_path(&config.path)?;
        ensure_parent_dir(&config.path)?;
        let mut connection = open_connection(config)?;
        initialize_schema(&mut connection)?;
        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }
}

impl VendorStore for SqliteVendorStore {
    fn transact(&self, work: &mut TransactionWork<'_>) -> Result<(), StoreError> {
        let mut guard = self
            .connection
            .lock()
            .map_err(|_| StoreError::Store("mutex poisoned".to_string()))?;
        {
            let tx = guard
                .transaction_with_behavior(TransactionBehavior::Immediate)
                .map_err(|err| StoreError::from(db_error(err)))?;
            let mut handle = SqliteTransaction {
                tx,
            };
            work(&mut handle)?;
            handle.tx.commit().map_err(|err| StoreError::from(db_error(err)))?;
        }
        drop(guard);
        Ok(())
    }
}

// ============================================================================//
// SECTION: Transaction Handle
// ============================================================================//

/// Open `SQLite` transaction exposed to service work.
///
/// Dropping the handle without committing rolls the transaction back.
struct SqliteTransaction<'conn> {
    /// Underlying rusqlite transaction.
    tx: Transaction<'conn>,
}

impl SqliteTransaction<'_> {
    /// Loads one vendor row.
    fn load_vendor(&self, code: &VendorCode) -> Result<Option<Vendor>, SqliteStoreError> {
        self.tx
            .query_row(
                &format!("SELECT {VENDOR_COLUMNS} FROM vendors WHERE vendor_code = ?1"),
                params![code.as_str()],
                vendor_from_row,
            )
            .optional()
            .map_err(db_error)
    }

    /// Loads all vendor rows ordered by code.
    fn load_vendors(&self) -> Result<Vec<Vendor>, SqliteStoreError> {
        let mut statement = self
            .tx
            .prepare(&format!("SELECT {VENDOR_COLUMNS} FROM vendors ORDER BY vendor_code"))
            .map_err(db_error)?;
        let rows = statement.query_map(params![], vendor_from_row).map_err(db_error)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(db_error)
    }

    /// Inserts or replaces vendor columns.
    fn write_vendor(&self, vendor: &Vendor, insert: bool) -> Result<(), SqliteStoreError> {
        let metrics = &vendor.metrics;
        let sql = if insert {
            "INSERT INTO vendors (vendor_code, name, contact_details, address, \
             on_time_delivery_rate, quality_rating_avg, average_response_time, fulfillment_rate, \
             updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"
        } else {
            "UPDATE vendors SET name = ?2, contact_details = ?3, address = ?4, \
             on_time_delivery_rate = ?5, quality_rating_avg = ?6, average_response_time = ?7, \
             fulfillment_rate = ?8, updated_at = ?9 WHERE vendor_code = ?1"
        };
        let changed = self
            .tx
            .execute(
                sql,
                params![
                    vendor.vendor_code.as_str(),
                    vendor.name,
                    vendor.contact_details,
                    vendor.address,
                    metrics.on_time_delivery_rate,
                    metrics.quality_rating_avg,
                    metrics.average_response_time,
                    metrics.fulfillment_rate,
                    unix_millis()
                ],
            )
            .map_err(db_error)?;
        if changed == 0 {
            return Err(SqliteStoreError::Invalid(format!(
                "vendor {} does not exist",
                vendor.vendor_code
            )));
        }
        Ok(())
    }

    /// Loads one purchase order row.
    fn load_order(&self, number: &PoNumber) -> Result<Option<PurchaseOrder>, SqliteStoreError> {
        let row = self
            .tx
            .query_row(
                &format!("SELECT {ORDER_COLUMNS} FROM purchase_orders WHERE po_number = ?1"),
                params![number.as_str()],
                OrderRow::from_row,
            )
            .optional()
            .map_err(db_error)?;
        row.map(PurchaseOrder::try_from).transpose()
    }

    /// Loads purchase order rows ordered by number.
    fn load_orders(
        &self,
        vendor: Option<&VendorCode>,
    ) -> Result<Vec<PurchaseOrder>, SqliteStoreError> {
        let rows = if let Some(code) = vendor {
            let mut statement = self
                .tx
                .prepare(&format!(
                    "SELECT {ORDER_COLUMNS} FROM purchase_orders WHERE vendor_code = ?1 ORDER BY \
                     po_number"
                ))
                .map_err(db_error)?;
            let mapped =
                statement.query_map(params![code.as_str()], OrderRow::from_row).map_err(db_error)?;
            mapped.collect::<Result<Vec<_>, _>>().map_err(db_error)?
        } else {
            let mut statement = self
                .tx
                .prepare(&format!("SELECT {ORDER_COLUMNS} FROM purchase_orders ORDER BY po_number"))
                .map_err(db_error)?;
            let mapped = statement.query_map(params![], OrderRow::from_row).map_err(db_error)?;
            mapped.collect::<Result<Vec<_>, _>>().map_err(db_error)?
        };
        rows.into_iter().map(PurchaseOrder::try_from).collect()
    }

    /// Inserts or replaces purchase order columns.
    fn write_order(&self, order: &PurchaseOrder, insert: bool) -> Result<(), SqliteStoreError> {
        let items_json = serde_json::to_string(&order.items)
            .map_err(|err| SqliteStoreError::Invalid(err.to_string()))?;
        let sql = if insert {
            "INSERT INTO purchase_orders (po_number, vendor_code, order_date, delivery_date, \
             items_json, quantity, status, quality_rating, issue_date, acknowledgement_date) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
        } else {
            "UPDATE purchase_orders SET vendor_code = ?2, order_date = ?3, delivery_date = ?4, \
             items_json = ?5, quantity = ?6, status = ?7, quality_rating = ?8, issue_date = ?9, \
             acknowledgement_date = ?10 WHERE po_number = ?1"
        };
        let acknowledged = order.acknowledgement_date.map(encode_time).transpose()?;
        let changed = self
            .tx
            .execute(
                sql,
                params![
                    order.po_number.as_str(),
                    order.vendor.as_str(),
                    encode_time(order.order_date)?,
                    encode_time(order.delivery_date)?,
                    items_json,
                    order.quantity,
                    order.status.as_str(),
                    order.quality_rating,
                    encode_time(order.issue_date)?,
                    acknowledged
                ],
            )
            .map_err(db_error)?;
        if changed == 0 {
            return Err(SqliteStoreError::Invalid(format!(
                "purchase order {} does not exist",
                order.po_number
            )));
        }
        Ok(())
    }

    /// Appends a history row.
    fn insert_history(&self, record: &HistoricalPerformance) -> Result<(), SqliteStoreError> {
        let metrics = &record.metrics;
        self.tx
            .execute(
                &format!(
                    "INSERT INTO historical_performance ({HISTORY_COLUMNS}) VALUES (?1, ?2, ?3, \
                     ?4, ?5, ?6)"
                ),
                params![
                    record.vendor.as_str(),
                    encode_time(record.date)?,
                    metrics.on_time_delivery_rate,
                    metrics.quality_rating_avg,
                    metrics.average_response_time,
                    metrics.fulfillment_rate
                ],
            )
            .map_err(db_error)?;
        Ok(())
    }

    /// Loads a vendor's history rows in insertion order.
    fn load_history(
        &self,
        vendor: &VendorCode,
    ) -> Result<Vec<HistoricalPerformance>, SqliteStoreError> {
        let mut statement = self
            .tx
            .prepare(&format!(
                "SELECT {HISTORY_COLUMNS} FROM historical_performance WHERE vendor_code = ?1 \
                 ORDER BY id"
            ))
            .map_err(db_error)?;
        let rows = statement
            .query_map(params![vendor.as_str()], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, i64>(1)?,
                    PerformanceMetrics {
                        on_time_delivery_rate: row.get(2)?,
                        quality_rating_avg: row.get(3)?,
                        average_response_time: row.get(4)?,
                        fulfillment_rate: row.get(5)?,
                    },
                ))
            })
            .map_err(db_error)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(db_error)?;
        rows.into_iter()
            .map(|(code, recorded_at, metrics)| {
                Ok(HistoricalPerformance {
                    vendor: VendorCode::new(code),
                    date: decode_time(recorded_at)?,
                    metrics,
                })
            })
            .collect()
    }

    /// Deletes by key and reports whether a row was removed.
    fn delete_row(&self, sql: &str, key: &str) -> Result<bool, SqliteStoreError> {
        let changed = self.tx.execute(sql, params![key]).map_err(db_error)?;
        Ok(changed > 0)
    }
}

impl StoreTransaction for SqliteTransaction<'_> {
    fn vendor(&self, code: &VendorCode) -> Result<Option<Vendor>, StoreError> {
        self.load_vendor(code).map_err(StoreError::from)
    }

    fn vendors(&self) -> Result<Vec<Vendor>, StoreError> {
        self.load_vendors().map_err(StoreError::from)
    }

    fn insert_vendor(&mut self, vendor: &Vendor) -> Result<(), StoreError> {
        self.write_vendor(vendor, true).map_err(StoreError::from)
    }

    fn update_vendor(&mut self, vendor: &Vendor) -> Result<(), StoreError> {
        self.write_vendor(vendor, false).map_err(StoreError::from)
    }

    fn delete_vendor(&mut self, code: &VendorCode) -> Result<bool, StoreError> {
        self.delete_row("DELETE FROM vendors WHERE vendor_code = ?1", code.as_str())
            .map_err(StoreError::from)
    }

    fn purchase_order(&self, number: &PoNumber) -> Result<Option<PurchaseOrder>, StoreError> {
        self.load_order(number).map_err(StoreError::from)
    }

    fn purchase_orders(
        &self,
        vendor: Option<&VendorCode>,
    ) -> Result<Vec<PurchaseOrder>, StoreError> {
        self.load_orders(vendor).map_err(StoreError::from)
    }

    fn insert_purchase_order(&mut self, order: &PurchaseOrder) -> Result<(), StoreError> {
        self.write_order(order, true).map_err(StoreError::from)
    }

    fn update_purchase_order(&mut self, order: &PurchaseOrder) -> Result<(), StoreError> {
        self.write_order(order, false).map_err(StoreError::from)
    }

    fn delete_purchase_order(&mut self, number: &PoNumber) -> Result<bool, StoreError> {
        self.delete_row("DELETE FROM purchase_orders WHERE po_number = ?1", number.as_str())
            .map_err(StoreError::from)
    }

    fn append_history(&mut self, record: &HistoricalPerformance) -> Result<(), StoreError> {
        self.insert_history(record).map_err(StoreError::from)
    }

    fn history(&self, vendor: &VendorCode) -> Result<Vec<HistoricalPerformance>, StoreError> {
        self.load_history(vendor).map_err(StoreError::from)
    }
}

// ============================================================================//
// SECTION: Row Mapping
// ============================================================================//

/// Reads a vendor row selected with [`VENDOR_COLUMNS`].
fn vendor_from_row(row: &Row<'_>) -> rusqlite::Result<Vendor> {
    Ok(Vendor {
        vendor_code: VendorCode::new(row.get::<_, String>(0)?),
        name: row.get(1)?,
        contact_details: row.get(2)?,
        address: row.get(3)?,
        metrics: PerformanceMetrics {
            on_time_delivery_rate: row.get(4)?,
            quality_rating_avg: row.get(5)?,
            average_response_time: row.get(6)?,
            fulfillment_rate: row.get(7)?,
        },
    })
}

/// Raw purchase order columns before decoding.
struct OrderRow {
    /// Primary key.
    po_number: String,
    /// Owning vendor code.
    vendor_code: String,
    /// Order date in unix microseconds.
    order_date: i64,
    /// Delivery date in unix microseconds.
    delivery_date: i64,
    /// Items object as JSON text.
    items_json: String,
    /// Ordered quantity.
    quantity: i64,
    /// Status label.
    status: String,
    /// Optional quality rating.
    quality_rating: Option<f64>,
    /// Issue date in unix microseconds.
    issue_date: i64,
    /// Optional acknowledgement date in unix microseconds.
    acknowledgement_date: Option<i64>,
}

impl OrderRow {
    /// Reads a row selected with [`ORDER_COLUMNS`].
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            po_number: row.get(0)?,
            vendor_code: row.get(1)?,
            order_date: row.get(2)?,
            delivery_date: row.get(3)?,
            items_json: row.get(4)?,
            quantity: row.get(5)?,
            status: row.get(6)?,
            quality_rating: row.get(7)?,
            issue_date: row.get(8)?,
            acknowledgement_date: row.get(9)?,
        })
    }
}

impl TryFrom<OrderRow> for PurchaseOrder {
    type Error = SqliteStoreError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let items: Map<String, Value> = serde_json::from_str(&row.items_json).map_err(|err| {
            SqliteStoreError::Corrupt(format!("items_json for {}: {err}", row.po_number))
        })?;
        let status = PurchaseOrderStatus::parse(&row.status).ok_or_else(|| {
            SqliteStoreError::Corrupt(format!("status '{}' for {}", row.status, row.po_number))
        })?;
        Ok(Self {
            po_number: PoNumber::new(row.po_number),
            vendor: VendorCode::new(row.vendor_code),
            order_date: decode_time(row.order_date)?,
            delivery_date: decode_time(row.delivery_date)?,
            items,
            quantity: row.quantity,
            status,
            quality_rating: row.quality_rating,
            issue_date: decode_time(row.issue_date)?,
            acknowledgement_date: row.acknowledgement_date.map(decode_time).transpose()?,
        })
    }
}

/// Encodes a datetime column value.
fn encode_time(value: OffsetDateTime) -> Result<i64, SqliteStoreError> {
    to_unix_micros(value).map_err(|err| SqliteStoreError::Invalid(err.to_string()))
}

/// Decodes a datetime column value.
fn decode_time(micros: i64) -> Result<OffsetDateTime, SqliteStoreError> {
    from_unix_micros(micros).map_err(|err| SqliteStoreError::Corrupt(err.to_string()))
}

// ============================================================================//
// SECTION: Helpers
// ============================================================================//

/// Ensures the parent directory for the store exists.
fn ensure_parent_dir(path: &Path) -> Result<(), SqliteStoreError> {
    let Some(parent) = path.parent() else {
        return Err(SqliteStoreError::Io("store path missing parent directory".to_string()));
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    std::fs::create_dir_all(parent).map_err(|err| SqliteStoreError::Io(err.to_string()))
}

/// Validates store paths for safety limits.
fn validate_store_path(path: &Path) -> Result<(), SqliteStoreError> {
    let path_string = path.display().to_string();
    if path_string.is_empty() {
        return Err(SqliteStoreError::Invalid("store path is empty".to_string()));
    }
    if path_string.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(SqliteStoreError::Invalid("store path exceeds length limit".to_string()));
    }
    for component in path.components() {
        let name = component.as_os_str().to_string_lossy();
        if name.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(SqliteStoreError::Invalid(
                "store path contains an overlong component".to_string(),
            ));
        }
    }
    if path.is_dir() {
        return Err(SqliteStoreError::Invalid(
            "store path must be a file, not a directory".to_string(),
        ));
    }
    Ok(())
}

/// Opens an `SQLite` connection with secure defaults.
fn open_connection(config: &SqliteStoreConfig) -> Result<Connection, SqliteStoreError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
    let connection = Connection::open_with_flags(&config.path, flags)
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    apply_pragmas(&connection, config)?;
    Ok(connection)
}

/// Applies `SQLite` pragmas required for durability and cascades.
fn apply_pragmas(
    connection: &Connection,
    config: &SqliteStoreConfig,
) -> Result<(), SqliteStoreError> {
    connection
        .execute_batch("PRAGMA foreign_keys = ON;")
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .execute_batch(&format!("PRAGMA journal_mode = {};", config.journal_mode.pragma_value()))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .execute_batch(&format!("PRAGMA synchronous = {};", config.sync_mode.pragma_value()))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .busy_timeout(std::time::Duration::from_millis(config.busy_timeout_ms))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    Ok(())
}

/// Initializes the `SQLite` schema or validates existing version.
fn initialize_schema(connection: &mut Connection) -> Result<(), SqliteStoreError> {
    let tx = connection.transaction().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    tx.execute_batch("CREATE TABLE IF NOT EXISTS store_meta (version INTEGER NOT NULL);")
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    let version: Option<i64> = tx
        .query_row("SELECT version FROM store_meta LIMIT 1", params![], |row| row.get(0))
        .optional()
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    match version {
        None => {
            tx.execute("INSERT INTO store_meta (version) VALUES (?1)", params![SCHEMA_VERSION])
                .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            tx.execute_batch(
                "CREATE TABLE IF NOT EXISTS vendors (
                    vendor_code TEXT PRIMARY KEY,
                    name TEXT NOT NULL,
                    contact_details TEXT NOT NULL,
                    address TEXT NOT NULL,
                    on_time_delivery_rate REAL NOT NULL,
                    quality_rating_avg REAL NOT NULL,
                    average_response_time REAL NOT NULL,
                    fulfillment_rate REAL NOT NULL,
                    updated_at INTEGER NOT NULL
                );
                CREATE TABLE IF NOT EXISTS purchase_orders (
                    po_number TEXT PRIMARY KEY,
                    vendor_code TEXT NOT NULL,
                    order_date INTEGER NOT NULL,
                    delivery_date INTEGER NOT NULL,
                    items_json TEXT NOT NULL,
                    quantity INTEGER NOT NULL,
                    status TEXT NOT NULL CHECK (status IN ('pending', 'cancelled', 'completed')),
                    quality_rating REAL,
                    issue_date INTEGER NOT NULL,
                    acknowledgement_date INTEGER,
                    FOREIGN KEY (vendor_code) REFERENCES vendors(vendor_code) ON DELETE CASCADE
                );
                CREATE INDEX IF NOT EXISTS idx_purchase_orders_vendor_code
                    ON purchase_orders (vendor_code);
                CREATE TABLE IF NOT EXISTS historical_performance (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    vendor_code TEXT NOT NULL,
                    recorded_at INTEGER NOT NULL,
                    on_time_delivery_rate REAL NOT NULL,
                    quality_rating_avg REAL NOT NULL,
                    average_response_time REAL NOT NULL,
                    fulfillment_rate REAL NOT NULL,
                    FOREIGN KEY (vendor_code) REFERENCES vendors(vendor_code) ON DELETE CASCADE
                );
                CREATE INDEX IF NOT EXISTS idx_historical_performance_vendor_code
                    ON historical_performance (vendor_code, id);",
            )
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        }
        Some(value) if value == SCHEMA_VERSION => {}
        Some(value) => {
            return Err(SqliteStoreError::VersionMismatch(format!(
                "unsupported schema version: {value}"
            )));
        }
    }
    tx.commit().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    Ok(())
}

/// Returns the current unix epoch in milliseconds.
fn unix_millis() -> i64 {
    let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
    i64::try_from(now.as_millis()).unwrap_or(i64::MAX)
}
