//! STK access reports and result tables
mod formatting;
mod parsing;

pub use parsing::AccessReport;
