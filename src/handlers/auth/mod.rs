pub mod admin;
pub mod login;
pub mod otp;
pub mod session;
pub mod verify;
