//! Decoded records
//!
//! A `DecodedRecord` is the typed form of one fixture row. It is built once
//! and never modified; validation and submission only borrow it.

use serde::Serialize;
use serde_json::{Map, Value};

use super::errors::DecodeResult;
use super::header::ColumnHeader;
use super::value::{coerce, decode_field};

/// Mapping from field name to typed value
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct DecodedRecord {
    fields: Map<String, Value>,
}

impl DecodedRecord {
    /// Wraps an already-typed mapping
    pub fn from_map(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Returns the value of a field
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Returns true if the field is present (even if null)
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the record has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Borrow the underlying mapping
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Iterate over `(name, value)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    /// Converts into a JSON object ready for serialization
    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}

impl From<Map<String, Value>> for DecodedRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self::from_map(fields)
    }
}

/// Decodes one row given as `(header, raw)` pairs.
///
/// Stops at the first cell that fails to coerce. When two headers decode to
/// the same field name the later column wins.
pub fn decode_row<'a, I>(row: I) -> DecodeResult<DecodedRecord>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut fields = Map::new();
    for (header, raw) in row {
        let (name, value) = decode_field(header, raw)?;
        fields.insert(name, value);
    }
    Ok(DecodedRecord { fields })
}

/// Decoder for many rows sharing one header row.
///
/// Headers are parsed once up front; each row is then a positional slice of
/// raw cells.
#[derive(Debug, Clone)]
pub struct RowDecoder {
    headers: Vec<ColumnHeader>,
}

impl RowDecoder {
    /// Parses the header row
    pub fn new<S: AsRef<str>>(headers: &[S]) -> Self {
        Self {
            headers: headers.iter().map(|h| ColumnHeader::parse(h.as_ref())).collect(),
        }
    }

    /// Parsed headers in column order
    pub fn headers(&self) -> &[ColumnHeader] {
        &self.headers
    }

    /// Headers whose declared type tag is not recognized
    pub fn unrecognized(&self) -> impl Iterator<Item = &ColumnHeader> {
        self.headers.iter().filter(|h| !h.is_recognized())
    }

    /// Decodes one row of raw cells.
    ///
    /// Cells beyond the header count are ignored; missing trailing cells
    /// decode as empty text.
    pub fn decode<S: AsRef<str>>(&self, cells: &[S]) -> DecodeResult<DecodedRecord> {
        let mut fields = Map::new();
        for (idx, header) in self.headers.iter().enumerate() {
            let raw = cells.get(idx).map(|c| c.as_ref()).unwrap_or("");
            let value = coerce(header.name(), raw, header.type_tag())?;
            fields.insert(header.name().to_string(), value);
        }
        Ok(DecodedRecord { fields })
    }
}
