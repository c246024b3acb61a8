//! Score reports and their renderings

pub mod formatter;
pub mod report;
