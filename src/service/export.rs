use crate::error::{AppError, AppResult};
use crate::models::{DivisionSales, ExecutiveReport};
use csv::Writer;

const HEADER: [&str; 8] = [
    "division",
    "gross_sales",
    "returns",
    "net_sales",
    "cogs",
    "gross_margin_pct",
    "collected",
    "collection_rate_pct",
];

fn record(label: &str, values: [f64; 7]) -> Vec<String> {
    std::iter::once(label.to_string())
        .chain(values.iter().map(|v| format!("{:.2}", v)))
        .collect()
}

fn division_values(row: &DivisionSales) -> [f64; 7] {
    [
        row.gross_sales,
        row.returns,
        row.net_sales,
        row.cogs,
        row.gross_margin,
        row.collected,
        row.collection_rate,
    ]
}

/// 导出事业部汇总 CSV (最后一行为合计)
pub fn division_summary_csv(report: &ExecutiveReport) -> AppResult<Vec<u8>> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(HEADER)?;

    for row in &report.division_sales {
        writer.write_record(record(row.division.display_name(), division_values(row)))?;
    }

    let kpi = &report.kpi;
    writer.write_record(record(
        "TOTAL",
        [
            kpi.grand_total_sales,
            kpi.grand_total_returns,
            kpi.net_sales,
            kpi.grand_total_cogs,
            kpi.gross_margin,
            kpi.grand_total_collected,
            kpi.collection_rate,
        ],
    ))?;

    writer.flush()?;
    writer
        .into_inner()
        .map_err(|e| AppError::Io(e.into_error()))
}
