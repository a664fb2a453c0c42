pub mod report_types;
pub mod scan_types;
