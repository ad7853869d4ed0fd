//! Vendor summary aggregation query
//!
//! One fixed query joining the three fact sources. PurchaseSummary is the
//! anchor: every summary row must have a purchase basis, sales and freight
//! are enrichments, so both joins are LEFT and unmatched aggregates come
//! back null (filled by the enricher).

use crate::error::{PipelineError, Result};
use crate::store::TableStore;
use polars::prelude::DataFrame;
use tracing::info;

pub const VENDOR_SUMMARY_SQL: &str = "
WITH FreightSummary AS (
    SELECT VendorNumber, SUM(Freight) AS FreightCost
    FROM vendor_invoice
    GROUP BY VendorNumber
),
PurchaseSummary AS (
    SELECT
        p.VendorNumber,
        p.VendorName,
        p.Brand,
        p.Description,
        p.PurchasePrice,
        pp.Price AS ActualPrice,
        pp.Volume,
        SUM(p.Quantity) AS TotalPurchaseQuantity,
        SUM(p.Dollars) AS TotalPurchaseDollars
    FROM purchases p
    JOIN purchase_prices pp ON p.Brand = pp.Brand
    WHERE p.PurchasePrice > 0
    GROUP BY p.VendorNumber, p.VendorName, p.Brand, p.Description, p.PurchasePrice, pp.Price, pp.Volume
),
SalesSummary AS (
    SELECT
        VendorNo,
        Brand,
        SUM(SalesQuantity) AS TotalSalesQuantity,
        SUM(SalesDollars) AS TotalSalesDollars,
        SUM(SalesPrice) AS TotalSalesPrice,
        SUM(ExciseTax) AS TotalExciseTax
    FROM sales
    GROUP BY VendorNo, Brand
)
SELECT
    ps.VendorNumber,
    ps.VendorName,
    ps.Brand,
    ps.Description,
    ps.PurchasePrice,
    ps.ActualPrice,
    ps.Volume,
    ps.TotalPurchaseQuantity,
    ps.TotalPurchaseDollars,
    ss.TotalSalesQuantity,
    ss.TotalSalesDollars,
    ss.TotalSalesPrice,
    ss.TotalExciseTax,
    fs.FreightCost
FROM PurchaseSummary ps
LEFT JOIN SalesSummary ss ON ps.VendorNumber = ss.VendorNo AND ps.Brand = ss.Brand
LEFT JOIN FreightSummary fs ON ps.VendorNumber = fs.VendorNumber
ORDER BY ps.TotalPurchaseDollars DESC
";

/// Run the aggregation. A failure here is fatal to the summary phase; a
/// partial summary is meaningless.
pub fn vendor_summary(store: &dyn TableStore) -> Result<DataFrame> {
    info!("🔍 Generating vendor summary using SQL joins");
    store
        .execute_query(VENDOR_SUMMARY_SQL)
        .map_err(|e| PipelineError::Query(format!("vendor summary query failed: {}", e)))
}
