//! HTTP API: configuration, request guard, routing, and response mapping.

pub mod app;
pub mod authz;
pub mod config;
pub mod context;
pub mod middleware;
