pub mod enrichment;
pub mod metafield_values;
pub mod report_service;
pub mod summary;

pub use report_service::ReportService;
