pub mod manager;
pub mod models;
pub mod repo;

pub use manager::{Database, DatabaseError};
