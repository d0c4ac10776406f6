mod error;
pub mod jwt;
pub mod password;
pub mod tokens;
mod types;

pub use error::AuthError;
pub use jwt::TokenIssuer;
pub use types::{Claims, Role};
