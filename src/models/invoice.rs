use super::lenient;
use super::DirectusRecord;
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 销售发票主表 (sales_invoice)，只用于按日期圈定明细
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    #[serde(default, alias = "id", deserialize_with = "lenient::key")]
    pub invoice_id: Option<String>,
    #[serde(default, alias = "date", deserialize_with = "lenient::date")]
    pub invoice_date: Option<NaiveDate>,
}

impl DirectusRecord for Invoice {
    const COLLECTION: &'static str = "sales_invoice";
    const FIELDS: &'static [&'static str] = &["invoice_id", "invoice_date"];
}

/// 销售发票明细 (sales_invoice_details)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceLineItem {
    #[serde(default, alias = "invoice_no", deserialize_with = "lenient::key")]
    pub invoice_id: Option<String>,
    #[serde(default, alias = "product", deserialize_with = "lenient::key")]
    pub product_id: Option<String>,
    #[serde(default, alias = "qty", deserialize_with = "lenient::decimal")]
    pub quantity: Option<BigDecimal>,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub total_amount: Option<BigDecimal>,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub discount_amount: Option<BigDecimal>,
}

impl DirectusRecord for InvoiceLineItem {
    const COLLECTION: &'static str = "sales_invoice_details";
    const FIELDS: &'static [&'static str] = &[
        "invoice_id",
        "product_id",
        "quantity",
        "total_amount",
        "discount_amount",
    ];
}
