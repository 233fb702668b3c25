pub mod common;
pub mod frontend;
pub mod ir;
pub mod kernel;
pub mod report;
