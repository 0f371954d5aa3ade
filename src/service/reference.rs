use super::classifier::{classify, ProductProfile};
use crate::models::{Division, SalesSnapshot};
use bigdecimal::BigDecimal;
use rayon::prelude::*;
use std::collections::HashMap;

/// 商品的已解析信息
#[derive(Debug, Clone, Default)]
pub struct ProductInfo {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub section: Option<String>,
    pub unit_cost: Option<BigDecimal>,
    pub parent_id: Option<String>,
}

/// 一次请求内的查找表
#[derive(Debug, Default)]
pub struct ReferenceMaps {
    pub products: HashMap<String, ProductInfo>,
    /// 商品 -> 第一个关联供应商
    pub primary_supplier: HashMap<String, String>,
    pub supplier_names: HashMap<String, String>,
    /// 业务员 -> 事业部 id
    pub salesman_division: HashMap<String, String>,
    /// 事业部 id -> 展示名
    pub division_names: HashMap<String, String>,
    /// 商品 -> 分类结果
    pub product_division: HashMap<String, Division>,
}

impl ReferenceMaps {
    pub fn build(snapshot: &SalesSnapshot) -> Self {
        let brand_names: HashMap<&str, &str> = snapshot
            .brands
            .iter()
            .filter_map(|b| Some((b.brand_id.as_deref()?, b.brand_name.as_deref()?)))
            .collect();
        let section_names: HashMap<&str, &str> = snapshot
            .sections
            .iter()
            .filter_map(|s| Some((s.section_id.as_deref()?, s.section_name.as_deref()?)))
            .collect();

        let mut products = HashMap::with_capacity(snapshot.products.len());
        for p in &snapshot.products {
            let Some(id) = p.product_id.clone() else { continue };
            let info = ProductInfo {
                name: p.product_name.clone(),
                brand: p
                    .product_brand
                    .as_deref()
                    .and_then(|b| brand_names.get(b))
                    .map(|b| b.to_string()),
                section: p
                    .product_section
                    .as_deref()
                    .and_then(|s| section_names.get(s))
                    .map(|s| s.to_string()),
                unit_cost: p.cost_per_unit.clone(),
                parent_id: p.parent_id.clone(),
            };
            products.entry(id).or_insert(info);
        }

        let mut primary_supplier = HashMap::new();
        for link in &snapshot.product_suppliers {
            if let (Some(product), Some(supplier)) = (&link.product_id, &link.supplier_id) {
                primary_supplier
                    .entry(product.clone())
                    .or_insert_with(|| supplier.clone());
            }
        }

        let supplier_names = snapshot
            .suppliers
            .iter()
            .filter_map(|s| Some((s.id.clone()?, s.supplier_name.clone()?)))
            .collect();
        let salesman_division = snapshot
            .salesmen
            .iter()
            .filter_map(|s| Some((s.id.clone()?, s.division_id.clone()?)))
            .collect();
        let division_names = snapshot
            .divisions
            .iter()
            .filter_map(|d| Some((d.division_id.clone()?, d.division_name.clone()?)))
            .collect();

        let mut maps = ReferenceMaps {
            products,
            primary_supplier,
            supplier_names,
            salesman_division,
            division_names,
            product_division: HashMap::new(),
        };

        // 整个商品目录并行分类
        let classified: HashMap<String, Division> = maps
            .products
            .par_iter()
            .map(|(id, info)| (id.clone(), maps.classify_product(id, info)))
            .collect();
        maps.product_division = classified;
        maps
    }

    fn classify_product(&self, product_id: &str, info: &ProductInfo) -> Division {
        let profile = ProductProfile {
            name: info.name.as_deref(),
            brand: info.brand.as_deref(),
            section: info.section.as_deref(),
        };
        let supplier = self.supplier_name_for(product_id);
        classify(&profile, supplier)
    }

    /// 有效供应商: 直接关联，否则取父商品的关联 (只向上一层)
    pub fn effective_supplier(&self, product_id: &str) -> Option<&str> {
        if let Some(supplier) = self.primary_supplier.get(product_id) {
            return Some(supplier);
        }
        let parent = self.products.get(product_id)?.parent_id.as_deref()?;
        self.primary_supplier.get(parent).map(String::as_str)
    }

    pub fn supplier_name_for(&self, product_id: &str) -> Option<&str> {
        let supplier_id = self.effective_supplier(product_id)?;
        self.supplier_names.get(supplier_id).map(String::as_str)
    }

    /// 目录外的商品按空信息分类 (仍会参考供应商)
    pub fn division_of(&self, product_id: Option<&str>) -> Division {
        match product_id {
            Some(id) => match self.product_division.get(id) {
                Some(division) => *division,
                None => classify(&ProductProfile::default(), self.supplier_name_for(id)),
            },
            None => classify(&ProductProfile::default(), None),
        }
    }

    pub fn unit_cost(&self, product_id: &str) -> Option<&BigDecimal> {
        self.products.get(product_id)?.unit_cost.as_ref()
    }

    /// 业务员所属事业部，映射到固定四个事业部
    pub fn salesman_division(&self, salesman_id: &str) -> Option<Division> {
        let division_id = self.salesman_division.get(salesman_id)?;
        let name = self.division_names.get(division_id)?;
        Division::from_record_name(name)
    }
}
