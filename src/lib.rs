//! Liseuse library client core
//!
//! Client-side core for the Liseuse library service: typed models for
//! books, members, borrows and reservations, an HTTP-JSON access layer
//! over the remote catalog and membership routes, and a lending
//! workflow engine that walks a checkout from book selection to a
//! committed borrow or reservation.

pub mod access;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod workflow;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use workflow::LendingEngine;
