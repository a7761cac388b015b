//! Dashboard analytics over uploaded rows

use analytics_engine::{
    average, build_monthly_series, detect_anomalies, group_records_by, monthly_series_from_records,
    moving_average_forecast, top_n_by_sum, AnalyticsError, DatePoint, MonthlyPoint,
};
use field_resolver::{records_from_value, resolve, value_as_f64, RawRecord};
use proptest::prelude::*;
use serde_json::{json, Value};

fn rows(value: Value) -> Vec<RawRecord> {
    records_from_value(&value).unwrap()
}

#[test]
fn test_monthly_series_scenario() {
    let series = build_monthly_series(&[
        DatePoint::new("2024-01-05", 100.0),
        DatePoint::new("2024-01-20", 50.0),
    ]);
    assert_eq!(series, vec![MonthlyPoint { month: "2024-01".into(), value: 150.0 }]);
}

#[test]
fn test_forecast_scenario() {
    let forecast = moving_average_forecast(
        &[DatePoint::new("m1", 10.0), DatePoint::new("m2", 20.0)],
        2,
        1,
    )
    .unwrap();
    assert_eq!(forecast.len(), 1);
    assert_eq!(forecast[0].value, 15.0);
}

#[test]
fn test_revenue_pipeline_from_billing_rows() {
    let billing = rows(json!([
        {"Visit_Date": "2024-01-03", "Total_Amount": 1000, "Doctor_ID": "D1"},
        {"Visit_Date": "2024-01-19", "Total_Amount": 500, "Doctor_ID": "D2"},
        {"Visit_Date": "2024-02-07", "Total_Amount": 1200, "Doctor_ID": "D1"},
        {"Visit_Date": "2024-03-11", "Total_Amount": 900, "Doctor_ID": "D3"},
        {"Visit_Date": "unknown", "Total_Amount": 7000, "Doctor_ID": "D3"}
    ]));

    let series = monthly_series_from_records(&billing, &["Visit_Date"], &["Total_Amount"]);
    let values: Vec<f64> = series.iter().map(|p| p.value).collect();
    assert_eq!(values, vec![1500.0, 1200.0, 900.0]);

    let history: Vec<DatePoint> = series.into_iter().map(DatePoint::from).collect();
    let forecast = moving_average_forecast(&history, 3, 2).unwrap();
    assert_eq!(forecast[0], DatePoint::new("2024-04", 1200.0));
    assert_eq!(forecast[1], DatePoint::new("2024-05", 1100.0));

    let top = top_n_by_sum(&billing, &["Doctor_ID"], &["Total_Amount"], 1);
    assert_eq!(top[0].key, "D3");
    assert_eq!(top[0].total, 7900.0);
    assert_eq!(top[0].count, 2);
}

#[test]
fn test_anomalies_report_magnitude() {
    let daily = [120.0, 118.0, 125.0, 122.0, 119.0, 121.0, 480.0, 123.0];
    let anomalies = detect_anomalies(&daily, 2.0).unwrap();
    assert_eq!(anomalies.len(), 1);
    assert_eq!(anomalies[0].index, 6);
    assert!(anomalies[0].z_score > 2.0);
}

#[test]
fn test_rejected_requests() {
    assert_eq!(moving_average_forecast(&[], 3, 1), Err(AnalyticsError::EmptySeries));
    assert!(matches!(detect_anomalies(&[1.0, 2.0], f64::INFINITY), Err(AnalyticsError::InvalidThreshold(_))));
}

#[test]
fn test_average_helper() {
    assert_eq!(average(&[]), 0.0);
    assert_eq!(average(&[250.0, 750.0]), 500.0);
}

fn arb_rows() -> impl Strategy<Value = Vec<Value>> {
    prop::collection::vec(
        (
            prop::option::of(prop::sample::select(vec!["CASH", "INSURANCE", "GOVT", "SELF"])),
            prop::option::of(0u32..10_000),
        )
            .prop_map(|(payer, amount)| {
                let mut row = serde_json::Map::new();
                if let Some(payer) = payer {
                    row.insert("Payer_Type".into(), json!(payer));
                }
                row.insert("Amount".into(), amount.map_or(json!("n/a"), |a| json!(a)));
                Value::Object(row)
            }),
        0..40,
    )
}

proptest! {
    #[test]
    fn prop_top_n_totals_match_full_grouping(data in arb_rows(), n in 0usize..6) {
        let records = rows(Value::Array(data));
        let top = top_n_by_sum(&records, &["Payer_Type"], &["Amount"], n);
        let groups = group_records_by(&records, &["Payer_Type"]);

        prop_assert!(top.len() <= n);
        prop_assert_eq!(top.len(), n.min(groups.len()));
        for entry in &top {
            let members = groups.get(&entry.key).cloned().unwrap_or_default();
            let expected: f64 = members
                .iter()
                .map(|row| resolve(row, &["Amount"]).and_then(value_as_f64).unwrap_or(0.0))
                .sum();
            prop_assert_eq!(entry.total, expected);
            prop_assert_eq!(entry.count, members.len());
        }
        for pair in top.windows(2) {
            prop_assert!(pair[0].total >= pair[1].total);
        }
    }

    #[test]
    fn prop_monthly_series_preserves_total(values in prop::collection::vec((1u32..=12, 0u32..1_000), 0..30)) {
        let points: Vec<DatePoint> = values
            .iter()
            .map(|(month, value)| DatePoint::new(format!("2024-{month:02}-15"), f64::from(*value)))
            .collect();
        let series = build_monthly_series(&points);
        let expected: f64 = points.iter().map(|p| p.value).sum();
        prop_assert_eq!(series.iter().map(|p| p.value).sum::<f64>(), expected);
        prop_assert!(series.windows(2).all(|w| w[0].month < w[1].month));
    }
}
