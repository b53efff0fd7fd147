//! Configuration modules for the Acadex API.
//!
//! Each submodule handles a specific aspect of configuration, typically
//! loaded from environment variables.
//!
//! # Modules
//!
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`database`]: PostgreSQL database connection pool initialization
//! - [`email`]: Email/SMTP configuration for reply notifications
//! - [`jwt`]: JWT authentication configuration
//! - [`media`]: Uploaded media storage configuration

pub mod cors;
pub mod database;
pub mod email;
pub mod jwt;
pub mod media;
