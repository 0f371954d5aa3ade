use super::reference::ReferenceMaps;
use crate::models::{Division, SalesSnapshot};
use bigdecimal::{BigDecimal, Zero};
use chrono::{Datelike, NaiveDate};
use std::collections::{BTreeMap, HashMap, HashSet};

pub const UNKNOWN_SUPPLIER: &str = "Unknown Supplier";

/// 趋势粒度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Granularity {
    Day,
    Month,
    /// 区间 <= 31 天按日，否则按月
    #[default]
    Auto,
}

impl Granularity {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "day" | "daily" => Some(Granularity::Day),
            "month" | "monthly" => Some(Granularity::Month),
            "auto" | "" => Some(Granularity::Auto),
            _ => None,
        }
    }

    pub fn resolve(self, from: NaiveDate, to: NaiveDate) -> Granularity {
        match self {
            Granularity::Auto if (to - from).num_days() < 31 => Granularity::Day,
            Granularity::Auto => Granularity::Month,
            fixed => fixed,
        }
    }

    pub fn bucket(self, date: NaiveDate) -> String {
        match self {
            Granularity::Month => month_key(date),
            _ => date.format("%Y-%m-%d").to_string(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Granularity::Day => "day",
            Granularity::Month => "month",
            Granularity::Auto => "auto",
        }
    }
}

pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// 区间内的每个月 (含首尾)
pub fn months_between(from: NaiveDate, to: NaiveDate) -> Vec<String> {
    let mut months = Vec::new();
    let (mut year, mut month) = (from.year(), from.month());
    while (year, month) <= (to.year(), to.month()) {
        months.push(format!("{:04}-{:02}", year, month));
        if month == 12 {
            year += 1;
            month = 1;
        } else {
            month += 1;
        }
    }
    months
}

/// 报表查询条件 (日期含首尾)
#[derive(Debug, Clone)]
pub struct ReportQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub division: Option<Division>,
    pub granularity: Granularity,
}

impl ReportQuery {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }

    pub fn accepts(&self, division: Division) -> bool {
        self.division.map_or(true, |wanted| wanted == division)
    }

    /// 参与汇总的事业部，按固定顺序
    pub fn divisions(&self) -> Vec<Division> {
        match self.division {
            Some(d) => vec![d],
            None => Division::ALL.to_vec(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Totals {
    /// 明细净额合计 (total - discount)
    pub sales: BigDecimal,
    pub returns: BigDecimal,
    pub cogs: BigDecimal,
    pub collected: BigDecimal,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SupplierTotals {
    pub net_sales: BigDecimal,
    pub cogs: BigDecimal,
    pub quantity: BigDecimal,
}

/// 单次请求的累加器
#[derive(Debug, Default)]
pub struct Accumulator {
    pub grand: Totals,
    pub by_division: HashMap<Division, Totals>,
    /// 趋势桶 (键可直接按字典序排序)
    pub trend: BTreeMap<String, BigDecimal>,
    /// 事业部 -> 供应商 -> 月份 -> 净额
    pub heatmap: HashMap<Division, HashMap<String, BTreeMap<String, BigDecimal>>>,
    pub suppliers: HashMap<Division, HashMap<String, SupplierTotals>>,
    pub line_items: usize,
    pub return_items: usize,
    pub collections: usize,
}

fn or_zero(value: &Option<BigDecimal>) -> BigDecimal {
    value.clone().unwrap_or_else(BigDecimal::zero)
}

/// 三趟汇总: 发票明细 -> 退货明细 -> 回款
pub fn aggregate(snapshot: &SalesSnapshot, maps: &ReferenceMaps, query: &ReportQuery) -> Accumulator {
    let mut acc = Accumulator::default();
    let bucket = query.granularity.resolve(query.from, query.to);

    // 1. 发票明细
    let invoice_dates: HashMap<&str, NaiveDate> = snapshot
        .invoices
        .iter()
        .filter_map(|inv| Some((inv.invoice_id.as_deref()?, inv.invoice_date?)))
        .filter(|(_, date)| query.contains(*date))
        .collect();

    for item in &snapshot.line_items {
        let Some(date) = item
            .invoice_id
            .as_deref()
            .and_then(|id| invoice_dates.get(id))
        else {
            continue;
        };

        let product_id = item.product_id.as_deref();
        let division = maps.division_of(product_id);
        if !query.accepts(division) {
            continue;
        }

        let quantity = or_zero(&item.quantity);
        let net = or_zero(&item.total_amount) - or_zero(&item.discount_amount);
        let unit_cost = product_id
            .and_then(|id| maps.unit_cost(id))
            .cloned()
            .unwrap_or_else(BigDecimal::zero);
        let cogs = &unit_cost * &quantity;

        acc.line_items += 1;
        acc.grand.sales += &net;
        acc.grand.cogs += &cogs;
        let totals = acc.by_division.entry(division).or_default();
        totals.sales += &net;
        totals.cogs += &cogs;
        *acc.trend.entry(bucket.bucket(*date)).or_insert_with(BigDecimal::zero) += &net;

        if net > BigDecimal::zero() {
            let supplier = product_id
                .and_then(|id| maps.supplier_name_for(id))
                .unwrap_or(UNKNOWN_SUPPLIER)
                .to_string();

            *acc.heatmap
                .entry(division)
                .or_default()
                .entry(supplier.clone())
                .or_default()
                .entry(month_key(*date))
                .or_insert_with(BigDecimal::zero) += &net;

            let ranking = acc
                .suppliers
                .entry(division)
                .or_default()
                .entry(supplier)
                .or_default();
            ranking.net_sales += &net;
            ranking.cogs += &cogs;
            ranking.quantity += &quantity;
        }
    }

    // 2. 退货明细: 只认区间内退货单号
    let return_numbers: HashSet<&str> = snapshot
        .returns
        .iter()
        .filter(|r| r.return_date.map_or(false, |d| query.contains(d)))
        .filter_map(|r| r.return_number.as_deref())
        .collect();

    for item in &snapshot.return_items {
        let in_range = item
            .return_no
            .as_deref()
            .map_or(false, |no| return_numbers.contains(no));
        if !in_range {
            continue;
        }

        let division = maps.division_of(item.product_id.as_deref());
        if !query.accepts(division) {
            continue;
        }

        let value = or_zero(&item.total_amount).abs();
        acc.return_items += 1;
        acc.grand.returns += &value;
        acc.by_division.entry(division).or_default().returns += &value;
    }

    // 3. 回款: 排除作废，按业务员的事业部归属
    for collection in &snapshot.collections {
        if collection.is_cancelled {
            continue;
        }
        if !collection.collection_date.map_or(false, |d| query.contains(d)) {
            continue;
        }

        let amount = or_zero(&collection.total_amount);
        let division = collection
            .salesman_id
            .as_deref()
            .and_then(|id| maps.salesman_division(id));

        match (query.division, division) {
            (None, resolved) => {
                acc.grand.collected += &amount;
                if let Some(d) = resolved {
                    acc.by_division.entry(d).or_default().collected += &amount;
                }
            }
            (Some(wanted), Some(d)) if wanted == d => {
                acc.grand.collected += &amount;
                acc.by_division.entry(d).or_default().collected += &amount;
            }
            _ => continue,
        }
        acc.collections += 1;
    }

    tracing::debug!(
        "Aggregated {} line items, {} return items, {} collections",
        acc.line_items, acc.return_items, acc.collections
    );
    acc
}
