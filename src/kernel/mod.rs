pub mod check;
pub mod conversion;
pub mod declare;
pub mod eliminate;
pub mod error;
pub mod evaluate;
pub mod signature;
pub mod unevaluate;

#[cfg(test)]
pub(crate) mod fixtures;
