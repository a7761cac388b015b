//! Field resolution for uploaded healthcare datasets
//!
//! Billing and roster uploads arrive as untyped records whose column names
//! drift between exports (`Doctor_ID`, `doctor id`, `DoctorId`, `Attending Doctor ID`).
//! This crate reconciles those headers against a list of known aliases and
//! coerces the matched value into a typed outcome.
//!
//! # Resolution order
//!
//! 1. **Exact**: the alias is a key of the record
//! 2. **Normalized**: keys compared case-insensitively, ignoring `_`, `-` and spaces
//! 3. **Substring**: either normalized form contains the other, shortest alias first
//!
//! A matched value that is `null` or blank does not count as a match and the
//! search continues. Every function here is total: untrusted input never panics.
//!
//! # Example
//!
//! ```rust
//! use field_resolver::{resolve_text, resolve_integer, Parsed, RawRecord};
//! use serde_json::json;
//!
//! let row: RawRecord = serde_json::from_value(json!({
//!     "patient id": "P-001",
//!     "AGE": "42"
//! })).unwrap_or_default();
//!
//! assert_eq!(resolve_text(&row, &["Patient_ID"]).as_deref(), Some("P-001"));
//! assert_eq!(resolve_integer(&row, &["Age"]), Parsed::Value(42));
//! ```

pub mod resolver;
pub mod coerce;
pub mod dates;
pub mod error;

pub use resolver::*;
pub use coerce::*;
pub use dates::*;
pub use error::*;
