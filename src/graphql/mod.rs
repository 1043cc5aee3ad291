pub mod context;
pub mod errors;
pub mod global_id;
pub mod mutations;
pub mod pagination;
pub mod queries;
pub mod schema;
pub mod types;

pub use context::*;
pub use schema::*;
