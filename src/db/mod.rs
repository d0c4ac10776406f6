pub mod connection;
pub mod dao;
pub mod entities;
pub mod store;

pub use store::{AuthStore, NewSession, NewUser, SeaOrmAuthStore};
