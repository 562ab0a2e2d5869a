//! shiftseed - typed CSV fixture loader for the shift scheduling API
//!
//! Fixture rows are decoded from type-tagged headers, validated against a
//! static entity schema and handed to a submitter one at a time.

pub mod cli;
pub mod decode;
pub mod loader;
pub mod observability;
pub mod schema;
pub mod source;
pub mod submit;
