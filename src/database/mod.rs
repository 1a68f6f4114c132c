pub mod manager;
pub mod models;
pub mod posts;
pub mod users;
pub mod votes;

pub use manager::{DatabaseError, DatabaseManager};
