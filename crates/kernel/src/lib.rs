//! Waypoint CMS Navigation Kernel
//!
//! This library provides the navigation core a CMS front end links against:
//! menu tree construction and sanitization, batched visit logging, and the
//! role hierarchy check. Persistence and rendering live in the embedding
//! application and talk to this crate through plain values.

pub mod config;
pub mod error;
pub mod menu;
pub mod models;
pub mod permissions;
pub mod visit;

pub use config::Config;
pub use error::{Error, Result};
