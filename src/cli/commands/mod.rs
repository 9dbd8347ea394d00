pub mod auth;
pub mod grocery;
pub mod recipe;
