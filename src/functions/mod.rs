pub mod catalog;
pub mod primitives;

pub use catalog::{FunctionCatalog, NodeFunction};
