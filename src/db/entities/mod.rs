#[allow(unused_imports)]
pub mod prelude {
    pub use super::session::Entity as Session;
    pub use super::user::Entity as User;
}

pub mod session;
pub mod user;
