//! Field Decoder
//!
//! Turns raw fixture rows into typed records. Every column header may carry
//! a type tag (`name(int)`, `name(float)`, `name(bool)`, `name(dict)`,
//! `name(string)`); the tag decides how the cell text is coerced.
//!
//! Decoding is pure: no I/O, no logging, same output for the same input.

mod errors;
mod header;
mod record;
mod value;

pub use errors::{DecodeError, DecodeResult};
pub use header::{ColumnHeader, TypeTag};
pub use record::{decode_row, DecodedRecord, RowDecoder};
pub use value::{coerce, decode_field};
