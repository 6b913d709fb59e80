pub mod order;
pub mod query;
pub mod value;
