//! Marketplace - a job board for clients and freelancers
//!
//! Clients post jobs, freelancers browse them and apply. Pages are rendered on
//! the server and access is decided per request from the session's account
//! role.

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod forms;
pub mod ui;

pub use config::Config;
pub use error::Error;
