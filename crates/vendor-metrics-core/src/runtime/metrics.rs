// crates/vendor-metrics-core/src/runtime/metrics.rs
// ============================================================================
// Module: Vendor Performance Metrics
// Description: Pure aggregate functions over a vendor's purchase orders.
// Purpose: Compute response time, quality, fulfillment, and snapshots.
// Dependencies: crate::core, time
// ============================================================================

//! ## Overview
//! Each function takes the full set of a vendor's purchase orders and returns
//! one aggregate. Empty inputs yield `0.0` rather than `NaN`. Values are not
//! rounded. The functions never touch storage; the service decides when to
//! call them and persists the results.

// ============================================================================
// SECTION: Imports
// ============================================================================

use time::OffsetDateTime;

use crate::core::HistoricalPerformance;
use crate::core::PurchaseOrder;
use crate::core::Vendor;

// ============================================================================
// SECTION: Metric Kinds
// ============================================================================

/// Metrics derived from purchase orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    /// Mean acknowledgement latency in seconds.
    ResponseTime,
    /// Mean quality rating over completed orders.
    QualityRating,
    /// Completed orders over all orders.
    FulfillmentRate,
}

// ============================================================================
// SECTION: Aggregates
// ============================================================================

/// Mean of `acknowledgement_date - issue_date` in seconds over acknowledged
/// orders; `0.0` when none are acknowledged.
#[must_use]
pub fn average_response_time(orders: &[PurchaseOrder]) -> f64 {
    let latencies: Vec<f64> = orders
        .iter()
        .filter_map(|order| {
            order
                .acknowledgement_date
                .map(|acknowledged| (acknowledged - order.issue_date).as_seconds_f64())
        })
        .collect();
    mean(&latencies)
}

/// Mean `quality_rating` over completed orders, skipping unrated ones; `0.0`
/// when no completed order carries a rating.
#[must_use]
pub fn quality_rating_average(orders: &[PurchaseOrder]) -> f64 {
    let ratings: Vec<f64> = orders
        .iter()
        .filter(|order| order.is_completed())
        .filter_map(|order| order.quality_rating)
        .collect();
    mean(&ratings)
}

/// Completed orders divided by all orders; `0.0` when there are no orders.
#[must_use]
pub fn fulfillment_rate(orders: &[PurchaseOrder]) -> f64 {
    if orders.is_empty() {
        return 0.0;
    }
    let completed = orders.iter().filter(|order| order.is_completed()).count();
    ratio(completed, orders.len())
}

/// Applies the requested recalculations to `vendor` in the given order.
pub fn recalculate(vendor: &mut Vendor, orders: &[PurchaseOrder], kinds: &[MetricKind]) {
    for kind in kinds {
        match kind {
            MetricKind::ResponseTime => {
                vendor.metrics.average_response_time = average_response_time(orders);
            }
            MetricKind::QualityRating => {
                vendor.metrics.quality_rating_avg = quality_rating_average(orders);
            }
            MetricKind::FulfillmentRate => {
                vendor.metrics.fulfillment_rate = fulfillment_rate(orders);
            }
        }
    }
}

/// Copies the vendor's current metrics into a snapshot dated `date`.
#[must_use]
pub fn snapshot(vendor: &Vendor, date: OffsetDateTime) -> HistoricalPerformance {
    HistoricalPerformance {
        vendor: vendor.vendor_code.clone(),
        date,
        metrics: vendor.metrics,
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Arithmetic mean, `0.0` for an empty slice.
fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / count_as_f64(values.len())
}

/// Divides two counts as floating point.
fn ratio(numerator: usize, denominator: usize) -> f64 {
    count_as_f64(numerator) / count_as_f64(denominator)
}

/// Converts a record count to `f64`.
#[allow(
    clippy::cast_precision_loss,
    reason = "Order counts stay far below 2^52, where f64 is exact."
)]
fn count_as_f64(count: usize) -> f64 {
    count as f64
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

    use serde_json::Map;
    use time::Duration;
    use time::macros::datetime;

    use super::*;
    use crate::core::PerformanceMetrics;
    use crate::core::PoNumber;
    use crate::core::PurchaseOrderStatus;
    use crate::core::VendorCode;

    fn order(
        number: &str,
        status: PurchaseOrderStatus,
        rating: Option<f64>,
        ack_after: Option<Duration>,
    ) -> PurchaseOrder {
        let issued = datetime!(2024-05-06 12:00:00 UTC);
        PurchaseOrder {
            po_number: PoNumber::new(number),
            vendor: VendorCode::new("V001"),
            order_date: issued,
            delivery_date: issued,
            items: Map::new(),
            quantity: 1,
            status,
            quality_rating: rating,
            issue_date: issued,
            acknowledgement_date: ack_after.map(|delta| issued + delta),
        }
    }

    #[test]
    fn empty_inputs_yield_zero() {
        assert_eq!(average_response_time(&[]), 0.0);
        assert_eq!(quality_rating_average(&[]), 0.0);
        assert_eq!(fulfillment_rate(&[]), 0.0);
    }

    #[test]
    fn response_time_averages_acknowledged_orders_only() {
        let orders = vec![
            order("PO1", PurchaseOrderStatus::Pending, None, Some(Duration::seconds(60))),
            order("PO2", PurchaseOrderStatus::Pending, None, Some(Duration::seconds(180))),
            order("PO3", PurchaseOrderStatus::Pending, None, None),
        ];
        assert_eq!(average_response_time(&orders), 120.0);
    }

    #[test]
    fn response_time_keeps_fractional_seconds() {
        let latency = Some(Duration::milliseconds(1500));
        let orders = vec![order("PO1", PurchaseOrderStatus::Pending, None, latency)];
        assert_eq!(average_response_time(&orders), 1.5);
    }

    #[test]
    fn quality_average_uses_completed_rated_orders() {
        let orders = vec![
            order("PO1", PurchaseOrderStatus::Completed, Some(4.0), None),
            order("PO2", PurchaseOrderStatus::Completed, Some(2.0), None),
            order("PO3", PurchaseOrderStatus::Completed, None, None),
            order("PO4", PurchaseOrderStatus::Pending, Some(5.0), None),
        ];
        assert_eq!(quality_rating_average(&orders), 3.0);
    }

    #[test]
    fn quality_average_is_zero_when_all_ratings_null() {
        let orders = vec![order("PO1", PurchaseOrderStatus::Completed, None, None)];
        assert_eq!(quality_rating_average(&orders), 0.0);
    }

    #[test]
    fn fulfillment_counts_every_status() {
        let orders = vec![
            order("PO1", PurchaseOrderStatus::Completed, None, None),
            order("PO2", PurchaseOrderStatus::Cancelled, None, None),
            order("PO3", PurchaseOrderStatus::Pending, None, None),
            order("PO4", PurchaseOrderStatus::Completed, None, None),
        ];
        assert_eq!(fulfillment_rate(&orders), 0.5);
    }

    #[test]
    fn recalculate_touches_only_requested_metrics() {
        let mut vendor = Vendor {
            vendor_code: VendorCode::new("V001"),
            name: "Acme".to_string(),
            contact_details: String::new(),
            address: String::new(),
            metrics: PerformanceMetrics {
                on_time_delivery_rate: 0.9,
                quality_rating_avg: 9.0,
                average_response_time: 9.0,
                fulfillment_rate: 9.0,
            },
        };
        let orders = vec![order("PO1", PurchaseOrderStatus::Completed, Some(4.0), None)];
        let kinds = [MetricKind::QualityRating, MetricKind::FulfillmentRate];
        recalculate(&mut vendor, &orders, &kinds);
        assert_eq!(vendor.metrics.quality_rating_avg, 4.0);
        assert_eq!(vendor.metrics.fulfillment_rate, 1.0);
        assert_eq!(vendor.metrics.average_response_time, 9.0);
        assert_eq!(vendor.metrics.on_time_delivery_rate, 0.9);

        let record = snapshot(&vendor, datetime!(2024-06-01 0:00 UTC));
        assert_eq!(record.metrics, vendor.metrics);
        assert_eq!(record.vendor, vendor.vendor_code);
    }
}
