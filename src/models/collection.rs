use super::lenient;
use super::DirectusRecord;
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 回款记录 (collection)，该表字段为驼峰命名
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collection {
    #[serde(default, deserialize_with = "lenient::key")]
    pub id: Option<String>,
    #[serde(rename = "collectionDate", default, alias = "collection_date", deserialize_with = "lenient::date")]
    pub collection_date: Option<NaiveDate>,
    #[serde(rename = "totalAmount", default, alias = "amount", deserialize_with = "lenient::decimal")]
    pub total_amount: Option<BigDecimal>,
    #[serde(rename = "isCancelled", default, alias = "is_cancelled", deserialize_with = "lenient::flag")]
    pub is_cancelled: bool,
    #[serde(rename = "salesmanId", default, alias = "salesman_id", deserialize_with = "lenient::key")]
    pub salesman_id: Option<String>,
}

impl DirectusRecord for Collection {
    const COLLECTION: &'static str = "collection";
    const FIELDS: &'static [&'static str] = &[
        "id",
        "collectionDate",
        "totalAmount",
        "isCancelled",
        "salesmanId",
    ];
}
