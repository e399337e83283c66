//! Request and response bodies

pub mod admin_dto;
pub mod verify_dto;

pub use admin_dto::{AddUserRequest, AddUserResponse};
pub use verify_dto::VerifyRequest;
