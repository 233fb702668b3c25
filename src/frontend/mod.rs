pub mod elaborate;
pub mod parse;
pub mod unparse;
