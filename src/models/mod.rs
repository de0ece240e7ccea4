pub mod activity;
pub mod location;
pub mod session;
pub mod summary;
