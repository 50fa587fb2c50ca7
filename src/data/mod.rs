pub mod dataset;
pub mod reader;
