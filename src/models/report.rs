use super::Division;
use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// 单个集合拉取失败的记录 (进 `_debug.errors`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchFailure {
    pub collection: String,
    pub status: Option<u16>,
    pub message: String,
}

/// 总体 / 事业部 KPI
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Kpi {
    pub grand_total_sales: f64,
    pub grand_total_returns: f64,
    pub net_sales: f64,
    pub grand_total_cogs: f64,
    pub gross_profit: f64,
    /// 毛利率 %
    pub gross_margin: f64,
    pub grand_total_collected: f64,
    /// 回款率 %
    pub collection_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DivisionSales {
    pub division: Division,
    pub gross_sales: f64,
    pub returns: f64,
    pub net_sales: f64,
    pub cogs: f64,
    pub gross_margin: f64,
    pub collected: f64,
    pub collection_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    /// `YYYY-MM-DD` 或 `YYYY-MM`
    pub date: String,
    pub sales: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierSales {
    pub supplier: String,
    pub net_sales: f64,
    pub cogs: f64,
    pub quantity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapRow {
    pub supplier: String,
    /// 月份 -> 净销售额，覆盖区间内每个月
    pub cells: IndexMap<String, f64>,
    pub total: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Heatmap {
    pub months: Vec<String>,
    pub rows: Vec<HeatmapRow>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugInfo {
    pub errors: Vec<FetchFailure>,
    pub counts: IndexMap<String, usize>,
    pub skipped_rows: usize,
    pub cached_collections: Vec<String>,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub division: String,
    pub granularity: String,
    pub elapsed_ms: u128,
}

/// `/api/sales/executive` 响应体
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutiveReport {
    pub kpi: Kpi,
    pub kpi_by_division: IndexMap<Division, Kpi>,
    pub division_sales: Vec<DivisionSales>,
    pub sales_trend: Vec<TrendPoint>,
    pub supplier_sales_by_division: IndexMap<Division, Vec<SupplierSales>>,
    pub heatmap_data_by_division: IndexMap<Division, Heatmap>,
    #[serde(rename = "_debug")]
    pub debug: DebugInfo,
}
