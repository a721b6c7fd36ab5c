pub mod manager;
pub mod models;

pub use manager::{is_unique_violation, DatabaseError, DatabaseManager};
