use super::lenient;
use super::DirectusRecord;
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 销售退货单 (sales_return)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesReturn {
    #[serde(default, alias = "return_no", deserialize_with = "lenient::key")]
    pub return_number: Option<String>,
    #[serde(default, alias = "date", deserialize_with = "lenient::date")]
    pub return_date: Option<NaiveDate>,
}

impl DirectusRecord for SalesReturn {
    const COLLECTION: &'static str = "sales_return";
    const FIELDS: &'static [&'static str] = &["return_number", "return_date"];
}

/// 销售退货明细 (sales_return_details)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnLineItem {
    #[serde(default, alias = "return_number", deserialize_with = "lenient::key")]
    pub return_no: Option<String>,
    #[serde(default, alias = "product", deserialize_with = "lenient::key")]
    pub product_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub total_amount: Option<BigDecimal>,
}

impl DirectusRecord for ReturnLineItem {
    const COLLECTION: &'static str = "sales_return_details";
    const FIELDS: &'static [&'static str] = &["return_no", "product_id", "total_amount"];
}
