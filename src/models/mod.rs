pub mod dto;
pub mod equipment;
pub mod error;
pub mod user;
pub use equipment::Equipment;
pub use error::Error;
pub use user::User;
