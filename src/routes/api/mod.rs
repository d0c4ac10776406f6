pub mod auth;
pub mod health;
mod router;
pub mod validation;

pub use router::router;
