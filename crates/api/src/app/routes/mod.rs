pub mod auth;
pub mod screens;
pub mod system;
