// crates/vendor-metrics-core/src/core/records.rs
// ============================================================================
// Module: Vendor Metrics Records
// Description: Vendor, purchase order, and historical performance records.
// Purpose: Define the canonical serialized shapes shared by stores and the API.
// Dependencies: serde, serde_json, time
// ============================================================================

//! ## Overview
//! These records are the single source of truth for the wire and storage
//! shapes. A [`Vendor`] serializes to exactly eight fields and a
//! [`PurchaseOrder`] to exactly ten, with datetimes rendered by
//! [`crate::core::time`]. Patch types carry partial updates; patch fields
//! that accept `null` use a nested `Option` so an explicit `null` clears the
//! value while an absent field leaves it untouched.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use time::OffsetDateTime;

use crate::core::identifiers::PoNumber;
use crate::core::identifiers::VendorCode;
use crate::core::time::datetime;
use crate::core::time::option_datetime;

// ============================================================================
// SECTION: Required Fields
// ============================================================================

/// Fields that must be present when creating a vendor, in reporting order.
pub const VENDOR_REQUIRED_FIELDS: &[&str] = &[
    "name",
    "contact_details",
    "address",
    "vendor_code",
    "on_time_delivery_rate",
    "quality_rating_avg",
    "average_response_time",
    "fulfillment_rate",
];

/// Fields that must be present when creating a purchase order, in reporting order.
pub const PURCHASE_ORDER_REQUIRED_FIELDS: &[&str] = &[
    "po_number",
    "vendor",
    "order_date",
    "delivery_date",
    "items",
    "quantity",
    "status",
    "issue_date",
];

/// Returns the required field names absent from `object`, preserving order.
///
/// Presence is what counts: a field explicitly set to `null` is present.
#[must_use]
pub fn missing_fields(object: &Map<String, Value>, required: &[&'static str]) -> Vec<&'static str> {
    required.iter().copied().filter(|field| !object.contains_key(*field)).collect()
}

// ============================================================================
// SECTION: Vendor
// ============================================================================

/// The four performance metrics tracked per vendor.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// Share of orders delivered on time (edited directly, never derived).
    pub on_time_delivery_rate: f64,
    /// Mean quality rating across completed orders.
    pub quality_rating_avg: f64,
    /// Mean acknowledgement latency in seconds.
    pub average_response_time: f64,
    /// Completed orders divided by all orders.
    pub fulfillment_rate: f64,
}

/// Vendor profile with its current performance metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vendor {
    /// Unique vendor code.
    pub vendor_code: VendorCode,
    /// Display name.
    pub name: String,
    /// Free-form contact details.
    pub contact_details: String,
    /// Postal address.
    pub address: String,
    /// Current performance metrics.
    #[serde(flatten)]
    pub metrics: PerformanceMetrics,
}

/// Partial vendor update. Absent fields keep their stored values.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct VendorPatch {
    /// Vendor code; must match the addressed vendor when present.
    #[serde(default)]
    pub vendor_code: Option<VendorCode>,
    /// Replacement name.
    #[serde(default)]
    pub name: Option<String>,
    /// Replacement contact details.
    #[serde(default)]
    pub contact_details: Option<String>,
    /// Replacement address.
    #[serde(default)]
    pub address: Option<String>,
    /// Replacement on-time delivery rate.
    #[serde(default)]
    pub on_time_delivery_rate: Option<f64>,
    /// Replacement quality rating average.
    #[serde(default)]
    pub quality_rating_avg: Option<f64>,
    /// Replacement average response time.
    #[serde(default)]
    pub average_response_time: Option<f64>,
    /// Replacement fulfillment rate.
    #[serde(default)]
    pub fulfillment_rate: Option<f64>,
}

impl VendorPatch {
    /// Applies the patch onto `vendor` in place.
    pub fn apply(self, vendor: &mut Vendor) {
        if let Some(name) = self.name {
            vendor.name = name;
        }
        if let Some(contact_details) = self.contact_details {
            vendor.contact_details = contact_details;
        }
        if let Some(address) = self.address {
            vendor.address = address;
        }
        let metrics = &mut vendor.metrics;
        if let Some(value) = self.on_time_delivery_rate {
            metrics.on_time_delivery_rate = value;
        }
        if let Some(value) = self.quality_rating_avg {
            metrics.quality_rating_avg = value;
        }
        if let Some(value) = self.average_response_time {
            metrics.average_response_time = value;
        }
        if let Some(value) = self.fulfillment_rate {
            metrics.fulfillment_rate = value;
        }
    }
}

// ============================================================================
// SECTION: Purchase Order
// ============================================================================

/// Purchase order lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseOrderStatus {
    /// Awaiting fulfillment.
    Pending,
    /// Cancelled before fulfillment.
    Cancelled,
    /// Fulfilled.
    Completed,
}

impl PurchaseOrderStatus {
    /// Returns the canonical lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }

    /// Parses a canonical label.
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "pending" => Some(Self::Pending),
            "cancelled" => Some(Self::Cancelled),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

/// Purchase order placed with a vendor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOrder {
    /// Unique purchase order number.
    pub po_number: PoNumber,
    /// Owning vendor.
    pub vendor: VendorCode,
    /// When the order was placed.
    #[serde(with = "datetime")]
    pub order_date: OffsetDateTime,
    /// Expected or actual delivery time.
    #[serde(with = "datetime")]
    pub delivery_date: OffsetDateTime,
    /// Unstructured item payload.
    pub items: Map<String, Value>,
    /// Ordered quantity.
    pub quantity: i64,
    /// Lifecycle status.
    pub status: PurchaseOrderStatus,
    /// Quality rating assigned on completion.
    #[serde(default)]
    pub quality_rating: Option<f64>,
    /// When the order was issued to the vendor.
    #[serde(with = "datetime")]
    pub issue_date: OffsetDateTime,
    /// When the vendor acknowledged the order.
    #[serde(default, with = "option_datetime")]
    pub acknowledgement_date: Option<OffsetDateTime>,
}

impl PurchaseOrder {
    /// Returns true when the order is completed.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == PurchaseOrderStatus::Completed
    }
}

/// Purchase order update.
///
/// Most fields are partial: an absent field keeps the stored value.
/// `quality_rating` and `acknowledgement_date` are always replaced, so
/// omitting them clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PurchaseOrderPatch {
    /// PO number; must match the addressed order when present.
    #[serde(default)]
    pub po_number: Option<PoNumber>,
    /// Owning vendor; must match the stored vendor when present.
    #[serde(default)]
    pub vendor: Option<VendorCode>,
    /// Replacement order date.
    #[serde(default, with = "option_datetime")]
    pub order_date: Option<OffsetDateTime>,
    /// Replacement delivery date.
    #[serde(default, with = "option_datetime")]
    pub delivery_date: Option<OffsetDateTime>,
    /// Replacement item payload.
    #[serde(default)]
    pub items: Option<Map<String, Value>>,
    /// Replacement quantity.
    #[serde(default)]
    pub quantity: Option<i64>,
    /// Replacement status.
    #[serde(default)]
    pub status: Option<PurchaseOrderStatus>,
    /// Quality rating after the update; absent or `null` clears it.
    #[serde(default)]
    pub quality_rating: Option<f64>,
    /// Replacement issue date.
    #[serde(default, with = "option_datetime")]
    pub issue_date: Option<OffsetDateTime>,
    /// Acknowledgement date after the update; absent or `null` clears it.
    #[serde(default, with = "option_datetime")]
    pub acknowledgement_date: Option<OffsetDateTime>,
}

impl PurchaseOrderPatch {
    /// Applies the mutable fields of the patch onto `order` in place.
    ///
    /// Identity fields (`po_number`, `vendor`) are checked by the caller.
    pub fn apply(self, order: &mut PurchaseOrder) {
        if let Some(value) = self.order_date {
            order.order_date = value;
        }
        if let Some(value) = self.delivery_date {
            order.delivery_date = value;
        }
        if let Some(value) = self.items {
            order.items = value;
        }
        if let Some(value) = self.quantity {
            order.quantity = value;
        }
        if let Some(value) = self.status {
            order.status = value;
        }
        order.quality_rating = self.quality_rating;
        if let Some(value) = self.issue_date {
            order.issue_date = value;
        }
        order.acknowledgement_date = self.acknowledgement_date;
    }
}

// ============================================================================
// SECTION: Historical Performance
// ============================================================================

/// Immutable point-in-time copy of a vendor's metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalPerformance {
    /// Vendor the snapshot belongs to.
    pub vendor: VendorCode,
    /// When the snapshot was taken.
    #[serde(with = "datetime")]
    pub date: OffsetDateTime,
    /// Metrics at snapshot time.
    #[serde(flatten)]
    pub metrics: PerformanceMetrics,
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        reason = "Test fixtures use explicit unwraps and exact literals."
    )]

    use serde_json::json;
    use time::macros::datetime;

    use super::*;

    fn sample_order() -> PurchaseOrder {
        serde_json::from_value(json!({
            "po_number": "PO001",
            "vendor": "V001",
            "order_date": "2024-05-06",
            "delivery_date": "2024-05-10 08:30:00",
            "items": {"widget": 3},
            "quantity": 3,
            "status": "pending",
            "issue_date": "2024-05-06T12:00:00Z"
        }))
        .unwrap()
    }

    #[test]
    fn vendor_serializes_eight_fields() {
        let vendor = Vendor {
            vendor_code: VendorCode::new("V001"),
            name: "Acme".to_string(),
            contact_details: "ops@acme.test".to_string(),
            address: "1 Main St".to_string(),
            metrics: PerformanceMetrics::default(),
        };
        let value = serde_json::to_value(&vendor).unwrap();
        assert_eq!(value.as_object().unwrap().len(), 8);
        assert_eq!(value["vendor_code"], "V001");
        assert_eq!(value["fulfillment_rate"], 0.0);
    }

    #[test]
    fn purchase_order_serializes_ten_fields_with_display_dates() {
        let order = sample_order();
        let value = serde_json::to_value(&order).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 10);
        assert_eq!(value["order_date"], "2024-05-06 00:00:00");
        assert_eq!(value["delivery_date"], "2024-05-10 08:30:00");
        assert_eq!(value["issue_date"], "2024-05-06 12:00:00");
        assert!(value["acknowledgement_date"].is_null());
        assert!(value["quality_rating"].is_null());
        assert_eq!(value["status"], "pending");
    }

    #[test]
    fn purchase_order_rejects_unknown_status() {
        let result = serde_json::from_value::<PurchaseOrder>(json!({
            "po_number": "PO001",
            "vendor": "V001",
            "order_date": "2024-05-06",
            "delivery_date": "2024-05-06",
            "items": {},
            "quantity": 1,
            "status": "shipped",
            "issue_date": "2024-05-06"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn missing_fields_reports_in_declared_order() {
        let object = json!({"name": "Acme", "address": null});
        let missing = missing_fields(object.as_object().unwrap(), VENDOR_REQUIRED_FIELDS);
        assert_eq!(
            missing,
            vec![
                "contact_details",
                "vendor_code",
                "on_time_delivery_rate",
                "quality_rating_avg",
                "average_response_time",
                "fulfillment_rate",
            ]
        );
    }

    #[test]
    fn order_patch_clears_rating_and_acknowledgement_when_absent() {
        let mut order = sample_order();
        order.quality_rating = Some(4.0);
        order.acknowledgement_date = Some(datetime!(2024-05-07 0:00 UTC));
        let original_items = order.items.clone();

        let patch: PurchaseOrderPatch = serde_json::from_value(json!({"quantity": 7})).unwrap();
        patch.apply(&mut order);
        assert_eq!(order.quantity, 7);
        assert_eq!(order.items, original_items);
        assert_eq!(order.quality_rating, None);
        assert_eq!(order.acknowledgement_date, None);

        let patch: PurchaseOrderPatch = serde_json::from_value(
            json!({"quality_rating": 2.5, "acknowledgement_date": "2024-05-08 09:00:00"}),
        )
        .unwrap();
        patch.apply(&mut order);
        assert_eq!(order.quality_rating, Some(2.5));
        assert_eq!(order.acknowledgement_date, Some(datetime!(2024-05-08 9:00 UTC)));

        let patch: PurchaseOrderPatch =
            serde_json::from_value(json!({"quality_rating": null})).unwrap();
        patch.apply(&mut order);
        assert_eq!(order.quality_rating, None);
        assert_eq!(order.quantity, 7);
    }

    #[test]
    fn vendor_patch_keeps_untouched_fields() {
        let mut vendor = Vendor {
            vendor_code: VendorCode::new("V001"),
            name: "Acme".to_string(),
            contact_details: "ops@acme.test".to_string(),
            address: "1 Main St".to_string(),
            metrics: PerformanceMetrics {
                on_time_delivery_rate: 0.9,
                ..PerformanceMetrics::default()
            },
        };
        let patch: VendorPatch = serde_json::from_value(json!({"name": "Acme Corp"})).unwrap();
        patch.apply(&mut vendor);
        assert_eq!(vendor.name, "Acme Corp");
        assert_eq!(vendor.address, "1 Main St");
        assert_eq!(vendor.metrics.on_time_delivery_rate, 0.9);
    }

    #[test]
    fn status_labels_round_trip() {
        for status in [
            PurchaseOrderStatus::Pending,
            PurchaseOrderStatus::Cancelled,
            PurchaseOrderStatus::Completed,
        ] {
            assert_eq!(PurchaseOrderStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(PurchaseOrderStatus::parse("Completed"), None);
    }
}
