pub mod contact;
pub mod health;
pub mod presigned;
pub mod upload;
