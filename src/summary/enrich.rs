//! KPI enrichment
//!
//! Batch transform over the whole summary relation. Order matters: nulls
//! are filled before the derived columns are computed, so a previously-null
//! denominator hits the zero guard instead of propagating a missing value.

use crate::error::Result;
use polars::prelude::*;
use tracing::info;

pub fn enrich(df: DataFrame) -> Result<DataFrame> {
    info!("🧽 Cleaning data and calculating KPIs");

    // 1. Volume arrives as text from the price list; make it numeric.
    let df = df
        .lazy()
        .with_columns([col("Volume").cast(DataType::Float64)])
        .collect()?;

    // 2. Blanket zero-fill across every remaining null.
    let fill_exprs: Vec<Expr> = df
        .get_columns()
        .iter()
        .filter_map(|s| match s.dtype() {
            DataType::String => Some(col(s.name()).fill_null(lit("0"))),
            dt if dt.is_numeric() => Some(col(s.name()).fill_null(lit(0))),
            _ => None,
        })
        .collect();

    // 3. Trim vendor name and description. The aggregate columns go to
    // Float64 here: integer-only facts sum to Int64 and `/` on two Int64
    // columns truncates, which would zero out fractional ratios below.
    let df = df
        .lazy()
        .with_columns(fill_exprs)
        .with_columns([
            col("VendorName").str().strip_chars(lit(NULL)),
            col("Description").str().strip_chars(lit(NULL)),
            col("TotalPurchaseQuantity").cast(DataType::Float64),
            col("TotalPurchaseDollars").cast(DataType::Float64),
            col("TotalSalesQuantity").cast(DataType::Float64),
            col("TotalSalesDollars").cast(DataType::Float64),
        ])
        .collect()?;

    // 4. Derived KPIs, each denominator independently guarded to 0.
    let df = df
        .lazy()
        .with_columns([(col("TotalSalesDollars") - col("TotalPurchaseDollars"))
            .alias("GrossProfit")])
        .with_columns([
            when(col("TotalSalesDollars").neq(lit(0.0)))
                .then(col("GrossProfit") / col("TotalSalesDollars") * lit(100.0))
                .otherwise(lit(0.0))
                .alias("ProfitMargin"),
            when(col("TotalPurchaseQuantity").neq(lit(0.0)))
                .then(col("TotalSalesQuantity") / col("TotalPurchaseQuantity"))
                .otherwise(lit(0.0))
                .alias("StockTurnover"),
            when(col("TotalPurchaseDollars").neq(lit(0.0)))
                .then(col("TotalSalesDollars") / col("TotalPurchaseDollars"))
                .otherwise(lit(0.0))
                .alias("SalesToPurchaseRatio"),
        ])
        .collect()?;

    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary_frame(
        purchase_qty: Vec<Option<i64>>,
        purchase_dollars: Vec<Option<f64>>,
        sales_qty: Vec<Option<f64>>,
        sales_dollars: Vec<Option<f64>>,
    ) -> DataFrame {
        let n = purchase_qty.len();
        df! [
            "VendorNumber" => (1..=n as i64).collect::<Vec<_>>(),
            "VendorName" => vec!["  Vendor A  "; n],
            "Brand" => vec![100i64; n],
            "Description" => vec![" Something "; n],
            "PurchasePrice" => vec![5.0; n],
            "ActualPrice" => vec![6.0; n],
            "Volume" => vec!["750"; n],
            "TotalPurchaseQuantity" => purchase_qty,
            "TotalPurchaseDollars" => purchase_dollars,
            "TotalSalesQuantity" => sales_qty,
            "TotalSalesDollars" => sales_dollars,
            "TotalSalesPrice" => vec![Option::<f64>::None; n],
            "TotalExciseTax" => vec![Option::<f64>::None; n],
            "FreightCost" => vec![Option::<f64>::None; n]
        ]
        .unwrap()
    }

    fn f64_col(df: &DataFrame, name: &str) -> Vec<f64> {
        df.column(name)
            .unwrap()
            .cast(&DataType::Float64)
            .unwrap()
            .f64()
            .unwrap()
            .into_no_null_iter()
            .collect()
    }

    #[test]
    fn gross_profit_is_exact_difference() {
        let df = summary_frame(
            vec![Some(10)],
            vec![Some(50.0)],
            vec![Some(4.0)],
            vec![Some(30.0)],
        );
        let out = enrich(df).unwrap();
        assert_eq!(f64_col(&out, "GrossProfit"), vec![-20.0]);
    }

    #[test]
    fn zero_denominators_yield_zero_not_nan() {
        // Nulls from an unmatched left join are filled to 0 first, so every
        // ratio hits its guard.
        let df = summary_frame(vec![Some(10)], vec![Some(50.0)], vec![None], vec![None]);
        let out = enrich(df).unwrap();
        assert_eq!(f64_col(&out, "GrossProfit"), vec![-50.0]);
        assert_eq!(f64_col(&out, "ProfitMargin"), vec![0.0]);
        assert_eq!(f64_col(&out, "SalesToPurchaseRatio"), vec![0.0]);

        let df = summary_frame(vec![Some(0)], vec![Some(0.0)], vec![Some(5.0)], vec![Some(25.0)]);
        let out = enrich(df).unwrap();
        assert_eq!(f64_col(&out, "StockTurnover"), vec![0.0]);
        assert_eq!(f64_col(&out, "SalesToPurchaseRatio"), vec![0.0]);
    }

    #[test]
    fn ratios_computed_when_denominators_nonzero() {
        let df = summary_frame(
            vec![Some(10)],
            vec![Some(50.0)],
            vec![Some(5.0)],
            vec![Some(100.0)],
        );
        let out = enrich(df).unwrap();
        assert_eq!(f64_col(&out, "GrossProfit"), vec![50.0]);
        assert_eq!(f64_col(&out, "ProfitMargin"), vec![50.0]);
        assert_eq!(f64_col(&out, "StockTurnover"), vec![0.5]);
        assert_eq!(f64_col(&out, "SalesToPurchaseRatio"), vec![2.0]);
    }

    #[test]
    fn integer_aggregates_divide_fractionally() {
        // Whole-number facts arrive as Int64 sums; the ratios must still be
        // true division, not truncating integer division.
        let df = df! [
            "VendorNumber" => [1i64],
            "VendorName" => ["Vendor A"],
            "Brand" => [100i64],
            "Description" => ["Brandy"],
            "PurchasePrice" => [5i64],
            "ActualPrice" => [6i64],
            "Volume" => ["750"],
            "TotalPurchaseQuantity" => [10i64],
            "TotalPurchaseDollars" => [50i64],
            "TotalSalesQuantity" => [5i64],
            "TotalSalesDollars" => [75i64],
            "TotalSalesPrice" => [15i64],
            "TotalExciseTax" => [2i64],
            "FreightCost" => [1i64]
        ]
        .unwrap();
        let out = enrich(df).unwrap();
        assert_eq!(f64_col(&out, "GrossProfit"), vec![25.0]);
        assert_eq!(f64_col(&out, "StockTurnover"), vec![0.5]);
        assert_eq!(f64_col(&out, "SalesToPurchaseRatio"), vec![1.5]);
        let margin = f64_col(&out, "ProfitMargin")[0];
        assert!((margin - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn volume_cast_and_strings_trimmed() {
        let df = summary_frame(
            vec![Some(10)],
            vec![Some(50.0)],
            vec![Some(4.0)],
            vec![Some(30.0)],
        );
        let out = enrich(df).unwrap();
        assert_eq!(out.column("Volume").unwrap().dtype(), &DataType::Float64);
        let names: Vec<&str> = out
            .column("VendorName")
            .unwrap()
            .str()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert_eq!(names, vec!["Vendor A"]);
    }
}
