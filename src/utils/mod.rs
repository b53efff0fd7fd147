//! Utility modules for the Acadex API.
//!
//! - [`email`]: Email sending utilities using SMTP
//! - [`jwt`]: JWT token creation and verification

pub mod email;
pub mod jwt;
