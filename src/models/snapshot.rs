use super::{
    Brand, Collection, DivisionRecord, FetchFailure, Invoice, InvoiceLineItem, Product,
    ProductSupplierLink, ReturnLineItem, SalesReturn, Salesman, Section, Supplier,
};
use indexmap::IndexMap;

/// 一次请求拉取到的所有扁平集合
#[derive(Debug, Clone, Default)]
pub struct SalesSnapshot {
    pub invoices: Vec<Invoice>,
    pub line_items: Vec<InvoiceLineItem>,
    pub products: Vec<Product>,
    pub product_suppliers: Vec<ProductSupplierLink>,
    pub suppliers: Vec<Supplier>,
    pub salesmen: Vec<Salesman>,
    pub divisions: Vec<DivisionRecord>,
    pub returns: Vec<SalesReturn>,
    pub return_items: Vec<ReturnLineItem>,
    pub collections: Vec<Collection>,
    pub brands: Vec<Brand>,
    pub sections: Vec<Section>,

    pub errors: Vec<FetchFailure>,
    /// 集合名 -> 行数
    pub counts: IndexMap<String, usize>,
    pub skipped_rows: usize,
    pub cached_collections: Vec<String>,
}

impl SalesSnapshot {
    pub fn total_rows(&self) -> usize {
        self.invoices.len()
            + self.line_items.len()
            + self.products.len()
            + self.product_suppliers.len()
            + self.suppliers.len()
            + self.salesmen.len()
            + self.divisions.len()
            + self.returns.len()
            + self.return_items.len()
            + self.collections.len()
            + self.brands.len()
            + self.sections.len()
    }

    /// 全部集合为空且至少一个拉取错误
    pub fn is_total_failure(&self) -> bool {
        self.total_rows() == 0 && !self.errors.is_empty()
    }
}
