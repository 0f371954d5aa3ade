use super::lenient;
use super::DirectusRecord;
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// 商品 (products)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, alias = "id", deserialize_with = "lenient::key")]
    pub product_id: Option<String>,
    #[serde(default, alias = "name", deserialize_with = "lenient::text")]
    pub product_name: Option<String>,
    #[serde(default, alias = "brand_id", deserialize_with = "lenient::key")]
    pub product_brand: Option<String>,
    #[serde(default, alias = "section_id", deserialize_with = "lenient::key")]
    pub product_section: Option<String>,
    /// 估算单位成本
    #[serde(default, alias = "estimated_unit_cost", deserialize_with = "lenient::decimal")]
    pub cost_per_unit: Option<BigDecimal>,
    /// 变体商品的父商品
    #[serde(default, alias = "parent_product_id", deserialize_with = "lenient::key")]
    pub parent_id: Option<String>,
}

impl DirectusRecord for Product {
    const COLLECTION: &'static str = "products";
    const FIELDS: &'static [&'static str] = &[
        "product_id",
        "product_name",
        "product_brand",
        "product_section",
        "cost_per_unit",
        "parent_id",
    ];
}

/// 商品-供应商关联 (product_per_supplier)，同一商品取第一条
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSupplierLink {
    #[serde(default, alias = "product", deserialize_with = "lenient::key")]
    pub product_id: Option<String>,
    #[serde(default, alias = "supplier", deserialize_with = "lenient::key")]
    pub supplier_id: Option<String>,
}

impl DirectusRecord for ProductSupplierLink {
    const COLLECTION: &'static str = "product_per_supplier";
    const FIELDS: &'static [&'static str] = &["product_id", "supplier_id"];
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Supplier {
    #[serde(default, alias = "supplier_id", deserialize_with = "lenient::key")]
    pub id: Option<String>,
    #[serde(default, alias = "name", deserialize_with = "lenient::text")]
    pub supplier_name: Option<String>,
}

impl DirectusRecord for Supplier {
    const COLLECTION: &'static str = "suppliers";
    const FIELDS: &'static [&'static str] = &["id", "supplier_name"];
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brand {
    #[serde(default, alias = "id", deserialize_with = "lenient::key")]
    pub brand_id: Option<String>,
    #[serde(default, alias = "name", deserialize_with = "lenient::text")]
    pub brand_name: Option<String>,
}

impl DirectusRecord for Brand {
    const COLLECTION: &'static str = "brand";
    const FIELDS: &'static [&'static str] = &["brand_id", "brand_name"];
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    #[serde(default, alias = "id", deserialize_with = "lenient::key")]
    pub section_id: Option<String>,
    #[serde(default, alias = "name", deserialize_with = "lenient::text")]
    pub section_name: Option<String>,
}

impl DirectusRecord for Section {
    const COLLECTION: &'static str = "sections";
    const FIELDS: &'static [&'static str] = &["section_id", "section_name"];
}
