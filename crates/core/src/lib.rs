//! TMS Core - Shared types library.
//!
//! This crate provides common types used across the TMS components:
//! - `web` - Public marketing site, course catalog and auth forms
//! - `integration-tests` - End-to-end tests of the web router
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no cookies.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Validated wrappers for emails, phone numbers, course IDs,
//!   prices, course enums and field-keyed validation errors

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
