pub mod aggregator;
pub mod classifier;
pub mod export;
pub mod finalizer;
pub mod money;
pub mod reference;
pub mod report;

pub use aggregator::{Granularity, ReportQuery};
pub use classifier::{classify, ProductProfile};
pub use reference::ReferenceMaps;
pub use report::SalesReportService;
