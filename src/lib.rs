//! User-management HTTP service: token login plus CRUD over an in-memory
//! user store, with request validation and centralized error mapping.

pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod state;
pub mod users;
pub mod validation;
