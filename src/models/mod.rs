pub mod collection;
pub mod division;
pub mod invoice;
pub mod lenient;
pub mod product;
pub mod report;
pub mod returns;
pub mod sales_team;
pub mod snapshot;

pub use collection::Collection;
pub use division::Division;
pub use invoice::{Invoice, InvoiceLineItem};
pub use product::{Brand, Product, ProductSupplierLink, Section, Supplier};
pub use report::{
    DebugInfo, DivisionSales, ExecutiveReport, FetchFailure, Heatmap, HeatmapRow, Kpi,
    SupplierSales, TrendPoint,
};
pub use returns::{ReturnLineItem, SalesReturn};
pub use sales_team::{DivisionRecord, Salesman};
pub use snapshot::SalesSnapshot;

/// Directus 集合行: 集合名 + 请求的字段列表
pub trait DirectusRecord: serde::de::DeserializeOwned + Send + 'static {
    const COLLECTION: &'static str;
    const FIELDS: &'static [&'static str];
}
