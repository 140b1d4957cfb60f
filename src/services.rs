pub mod aggregate;
pub mod registry;
pub mod report_service;

pub use report_service::ReportService;
