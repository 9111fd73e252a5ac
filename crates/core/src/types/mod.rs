//! Core types for TMS.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod course;
pub mod email;
pub mod field_errors;
pub mod id;
pub mod phone;
pub mod price;

pub use course::{CourseCategory, DeliveryMethod, DifficultyLevel};
pub use email::{Email, EmailError};
pub use field_errors::FieldErrors;
pub use id::*;
pub use phone::{PhoneNumber, PhoneNumberError};
pub use price::{CurrencyCode, Price};
