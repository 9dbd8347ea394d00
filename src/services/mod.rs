pub mod auth_service;
pub mod collection;
pub mod grocery_service;
pub mod recipe_service;

pub use auth_service::AuthService;
pub use collection::{Identified, RecordCollection};
pub use grocery_service::GroceryService;
pub use recipe_service::RecipeService;
