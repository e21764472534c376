pub mod revenue_report;

pub use revenue_report::{
    profit_margin, ReportAnalytics, ReportMetadata, ReportMetric, ReportRow, RevenueReport,
    RowIdentity, SummaryGroup,
};
