use super::aggregator::{months_between, Accumulator, ReportQuery, SupplierTotals, Totals};
use super::money::{percent_of, round_cents, to_currency, to_plain};
use crate::models::{
    DebugInfo, Division, DivisionSales, ExecutiveReport, Heatmap, HeatmapRow, Kpi, SupplierSales,
    TrendPoint,
};
use bigdecimal::{BigDecimal, Zero};
use indexmap::IndexMap;
use std::collections::{BTreeMap, HashMap};

pub const TOP_SUPPLIERS: usize = 10;

/// 派生 KPI: 净销售额、毛利率、回款率 (净额 <= 0 时两个比率为 0)
pub fn kpi_from(totals: &Totals) -> Kpi {
    let net = &totals.sales - &totals.returns;
    let gross_profit = &net - &totals.cogs;
    Kpi {
        grand_total_sales: to_currency(&totals.sales),
        grand_total_returns: to_currency(&totals.returns),
        net_sales: to_currency(&net),
        grand_total_cogs: to_currency(&totals.cogs),
        gross_profit: to_currency(&gross_profit),
        gross_margin: percent_of(&gross_profit, &net),
        grand_total_collected: to_currency(&totals.collected),
        collection_rate: percent_of(&totals.collected, &net),
    }
}

fn division_sales(division: Division, kpi: &Kpi) -> DivisionSales {
    DivisionSales {
        division,
        gross_sales: kpi.grand_total_sales,
        returns: kpi.grand_total_returns,
        net_sales: kpi.net_sales,
        cogs: kpi.grand_total_cogs,
        gross_margin: kpi.gross_margin,
        collected: kpi.grand_total_collected,
        collection_rate: kpi.collection_rate,
    }
}

fn top_suppliers(suppliers: Option<&HashMap<String, SupplierTotals>>) -> Vec<SupplierSales> {
    let mut ranked: Vec<(&String, &SupplierTotals)> = suppliers
        .map(|m| m.iter().collect())
        .unwrap_or_default();
    ranked.sort_by(|(name_a, a), (name_b, b)| {
        b.net_sales
            .cmp(&a.net_sales)
            .then_with(|| name_a.cmp(name_b))
    });
    ranked
        .into_iter()
        .take(TOP_SUPPLIERS)
        .map(|(name, totals)| SupplierSales {
            supplier: name.clone(),
            net_sales: to_currency(&totals.net_sales),
            cogs: to_currency(&totals.cogs),
            quantity: to_plain(&totals.quantity),
        })
        .collect()
}

/// 热力图: 每行覆盖区间内所有月份，total 为各格 (已取整) 之和
fn heatmap(
    months: &[String],
    cells: Option<&HashMap<String, BTreeMap<String, BigDecimal>>>,
) -> Heatmap {
    let mut rows: Vec<(BigDecimal, HeatmapRow)> = cells
        .map(|by_supplier| {
            by_supplier
                .iter()
                .map(|(supplier, by_month)| {
                    let mut total = BigDecimal::zero();
                    let mut row_cells = IndexMap::with_capacity(months.len());
                    for month in months {
                        let value = by_month
                            .get(month)
                            .map(round_cents)
                            .unwrap_or_else(BigDecimal::zero);
                        total += &value;
                        row_cells.insert(month.clone(), to_currency(&value));
                    }
                    let row = HeatmapRow {
                        supplier: supplier.clone(),
                        cells: row_cells,
                        total: to_currency(&total),
                    };
                    (total, row)
                })
                .collect()
        })
        .unwrap_or_default();

    rows.sort_by(|(total_a, a), (total_b, b)| {
        total_b
            .cmp(total_a)
            .then_with(|| a.supplier.cmp(&b.supplier))
    });

    Heatmap {
        months: months.to_vec(),
        rows: rows.into_iter().map(|(_, row)| row).collect(),
    }
}

/// 生成最终响应
pub fn finalize(acc: &Accumulator, query: &ReportQuery, debug: DebugInfo) -> ExecutiveReport {
    let divisions = query.divisions();
    let months = months_between(query.from, query.to);
    let empty = Totals::default();

    let mut kpi_by_division = IndexMap::new();
    let mut division_rows: Vec<(BigDecimal, DivisionSales)> = Vec::new();
    let mut supplier_sales_by_division = IndexMap::new();
    let mut heatmap_data_by_division = IndexMap::new();

    for division in divisions {
        let totals = acc.by_division.get(&division).unwrap_or(&empty);
        let kpi = kpi_from(totals);
        let net = &totals.sales - &totals.returns;
        division_rows.push((net, division_sales(division, &kpi)));
        kpi_by_division.insert(division, kpi);
        supplier_sales_by_division.insert(division, top_suppliers(acc.suppliers.get(&division)));
        heatmap_data_by_division.insert(division, heatmap(&months, acc.heatmap.get(&division)));
    }

    // 稳定排序，净额相同保持事业部固定顺序
    division_rows.sort_by(|(a, _), (b, _)| b.cmp(a));

    let sales_trend = acc
        .trend
        .iter()
        .map(|(date, sales)| TrendPoint {
            date: date.clone(),
            sales: to_currency(sales),
        })
        .collect();

    ExecutiveReport {
        kpi: kpi_from(&acc.grand),
        kpi_by_division,
        division_sales: division_rows.into_iter().map(|(_, row)| row).collect(),
        sales_trend,
        supplier_sales_by_division,
        heatmap_data_by_division,
        debug,
    }
}
