//! Raw cell coercion

use serde_json::{Number, Value};

use super::errors::{DecodeError, DecodeResult};
use super::header::{ColumnHeader, TypeTag};

/// Coerces one raw cell according to its column's type tag.
///
/// `column` is only used to label errors. Numeric literals may carry
/// surrounding whitespace; string and bool cells are taken verbatim.
///
/// `bool` is truthiness by non-emptiness: every non-empty text, including
/// `"false"` and `"0"`, is `true`, and only the empty string is `false`.
/// Existing fixture files depend on this, so it is kept as is.
pub fn coerce(column: &str, raw: &str, tag: TypeTag) -> DecodeResult<Value> {
    match tag {
        TypeTag::String => Ok(Value::String(raw.to_string())),
        TypeTag::Int => raw
            .trim()
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| DecodeError::InvalidInt {
                column: column.to_string(),
                raw: raw.to_string(),
            }),
        TypeTag::Float => {
            let parsed = raw
                .trim()
                .parse::<f64>()
                .map_err(|_| DecodeError::InvalidFloat {
                    column: column.to_string(),
                    raw: raw.to_string(),
                })?;
            // JSON has no NaN/inf
            Number::from_f64(parsed)
                .map(Value::Number)
                .ok_or_else(|| DecodeError::NonFiniteFloat {
                    column: column.to_string(),
                    raw: raw.to_string(),
                })
        }
        TypeTag::Bool => Ok(Value::Bool(!raw.is_empty())),
        TypeTag::Dict => serde_json::from_str(raw).map_err(|e| DecodeError::InvalidDict {
            column: column.to_string(),
            raw: raw.to_string(),
            reason: e.to_string(),
        }),
    }
}

/// Decodes a single `(header, raw)` pair into `(field_name, value)`.
pub fn decode_field(header: &str, raw: &str) -> DecodeResult<(String, Value)> {
    let header = ColumnHeader::parse(header);
    let value = coerce(header.name(), raw, header.type_tag())?;
    Ok((header.name().to_string(), value))
}
