//! Reference data: alias, category, market and course tables

pub mod store;
pub mod tables;

pub use store::TableStore;
pub use tables::ReferenceTables;
