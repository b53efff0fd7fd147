//! # Acadex Core
//!
//! Core types, errors, and utilities for the Acadex API.
//!
//! This crate provides foundational types used throughout the Acadex
//! application:
//!
//! - [`errors`]: Application error types with HTTP response conversion
//! - [`pagination`]: Pagination utilities for API responses
//! - [`password`]: Secure password hashing and verification
//! - [`slug`]: Deterministic URL slug derivation from display names
//! - [`media`]: File storage abstraction for uploaded media
//!
//! # Example
//!
//! ```ignore
//! use acadex_core::errors::AppError;
//! use acadex_core::slug::derive_slug;
//! use acadex_core::password::{hash_password, verify_password};
//!
//! let error = AppError::not_found(anyhow::anyhow!("Course not found"));
//! let slug = derive_slug("Chemistry A2!!"); // "chemistry-a2"
//! let hash = hash_password("secure_password")?;
//! ```

pub mod errors;
pub mod media;
pub mod pagination;
pub mod password;
pub mod serde;
pub mod slug;

// Re-export commonly used types at crate root
pub use errors::AppError;
pub use pagination::{PaginationMeta, PaginationParams};
pub use password::{hash_password, verify_password};
pub use slug::derive_slug;
