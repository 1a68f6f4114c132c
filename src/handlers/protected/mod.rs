pub mod posts;
pub mod session;
pub mod votes;
