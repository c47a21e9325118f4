//! # Argument Coercion
//!
//! Turns textual arguments into typed [`Value`]s, driven by the declared
//! [`TypeDescriptor`] of each parameter. The first bad argument aborts the
//! whole parse.
//!
//! Top-level scalar arguments are taken verbatim. Arrays, tuples and structs
//! are parsed as [`Literal`]s, and their elements are coerced from the
//! literal (so `'hosky'` inside a tuple is the string `hosky`).
//!
//! Byte sequences accept a Bech32m unshielded address first, then hex with an
//! optional `0x` prefix. An address always carries the `mn_` prefix, which is
//! never valid hex, so at most one of the two readings succeeds.

use crate::errors::{ArgumentError, CoercionCause, CoercionError};
use crate::literal::Literal;
use crate::manifest::{Parameter, TypeDescriptor};
use compact_executable::domain::Value;
use num_bigint::BigInt;
use shared_types::UnshieldedAddress;
use std::collections::BTreeMap;

/// Coerce `args` against `types`, position by position.
pub fn coerce<S: AsRef<str>>(
    args: &[S],
    types: &[TypeDescriptor],
) -> Result<Vec<Value>, CoercionError> {
    check_arity(types.len(), args.len())?;
    args.iter()
        .zip(types)
        .enumerate()
        .map(|(index, (arg, ty))| {
            let arg = arg.as_ref();
            coerce_text(arg, ty).map_err(|cause| CoercionError::Argument {
                index,
                source: ArgumentError {
                    input: arg.to_string(),
                    expected: ty.to_string(),
                    cause,
                },
            })
        })
        .collect()
}

fn check_arity(expected: usize, actual: usize) -> Result<(), CoercionError> {
    if expected == actual {
        Ok(())
    } else {
        Err(CoercionError::Arity { expected, actual })
    }
}

fn coerce_text(arg: &str, ty: &TypeDescriptor) -> Result<Value, CoercionCause> {
    match ty {
        TypeDescriptor::Number => parse_number(arg),
        TypeDescriptor::BigInt => parse_bigint(arg),
        TypeDescriptor::String => Ok(Value::String(arg.to_string())),
        TypeDescriptor::Boolean => parse_boolean(arg),
        TypeDescriptor::Bytes => parse_bytes(arg),
        TypeDescriptor::Array { .. } | TypeDescriptor::Tuple { .. } | TypeDescriptor::Struct { .. } => {
            coerce_literal(&Literal::parse(arg)?, ty)
        }
    }
}

fn coerce_literal(literal: &Literal, ty: &TypeDescriptor) -> Result<Value, CoercionCause> {
    match (ty, literal) {
        (TypeDescriptor::Number, Literal::Number(text)) => parse_number(text),
        (TypeDescriptor::BigInt, Literal::Number(text)) => parse_bigint(text),
        (TypeDescriptor::String, Literal::String(text) | Literal::Number(text)) => {
            Ok(Value::String(text.clone()))
        }
        (TypeDescriptor::Boolean, Literal::Boolean(b)) => Ok(Value::Boolean(*b)),
        (TypeDescriptor::Bytes, Literal::String(text)) => parse_bytes(text),
        (TypeDescriptor::Array { element }, Literal::Array(items)) => {
            let types = vec![element.as_ref(); items.len()];
            Ok(Value::Array(coerce_elements(items, &types)?))
        }
        (TypeDescriptor::Tuple { elements }, Literal::Array(items)) => {
            let types: Vec<&TypeDescriptor> = elements.iter().collect();
            Ok(Value::Array(coerce_elements(items, &types)?))
        }
        (TypeDescriptor::Struct { fields }, Literal::Object(entries)) => coerce_struct(fields, entries),
        (ty, literal) => Err(mismatch(ty, literal)),
    }
}

fn coerce_elements(items: &[Literal], types: &[&TypeDescriptor]) -> Result<Vec<Value>, Box<CoercionError>> {
    check_arity(types.len(), items.len())?;
    items
        .iter()
        .zip(types)
        .enumerate()
        .map(|(index, (item, ty))| {
            coerce_literal(item, ty).map_err(|cause| {
                Box::new(CoercionError::Argument {
                    index,
                    source: ArgumentError {
                        input: item.to_string(),
                        expected: ty.to_string(),
                        cause,
                    },
                })
            })
        })
        .collect()
}

/// Every declared field must be present and no undeclared field may appear.
fn coerce_struct(fields: &[Parameter], entries: &[(String, Literal)]) -> Result<Value, CoercionCause> {
    if let Some((name, _)) = entries
        .iter()
        .find(|(name, _)| !fields.iter().any(|field| &field.name == name))
    {
        return Err(CoercionCause::UnknownField(name.clone()));
    }

    let mut values = BTreeMap::new();
    for field in fields {
        let literal = entries
            .iter()
            .find(|(name, _)| *name == field.name)
            .map(|(_, literal)| literal)
            .ok_or_else(|| CoercionCause::MissingField(field.name.clone()))?;
        let value = coerce_literal(literal, &field.ty).map_err(|cause| {
            Box::new(CoercionError::Field {
                name: field.name.clone(),
                source: ArgumentError {
                    input: literal.to_string(),
                    expected: field.ty.to_string(),
                    cause,
                },
            })
        })?;
        values.insert(field.name.clone(), value);
    }
    Ok(Value::Struct(values))
}

fn mismatch(ty: &TypeDescriptor, literal: &Literal) -> CoercionCause {
    let text = literal.to_string();
    match ty {
        TypeDescriptor::Number => CoercionCause::InvalidNumber(text),
        TypeDescriptor::BigInt => CoercionCause::InvalidBigInt(text),
        TypeDescriptor::String => CoercionCause::NotAString(text),
        TypeDescriptor::Boolean => CoercionCause::InvalidBoolean(text),
        TypeDescriptor::Array { .. } | TypeDescriptor::Tuple { .. } => CoercionCause::NotAnArray(text),
        TypeDescriptor::Struct { .. } => CoercionCause::NotAnObject(text),
        TypeDescriptor::Bytes => CoercionCause::InvalidBytes {
            input: text,
            reason: "expected a string".into(),
        },
    }
}

// =============================================================================
// SCALARS
// =============================================================================

fn parse_number(text: &str) -> Result<Value, CoercionCause> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .map(Value::Number)
        .ok_or_else(|| CoercionCause::InvalidNumber(text.to_string()))
}

/// Optional sign, then decimal digits only.
fn parse_bigint(text: &str) -> Result<Value, CoercionCause> {
    let trimmed = text.trim();
    let digits = trimmed.strip_prefix(&['-', '+'][..]).unwrap_or(trimmed);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CoercionCause::InvalidBigInt(text.to_string()));
    }
    trimmed
        .parse::<BigInt>()
        .map(Value::BigInt)
        .map_err(|_| CoercionCause::InvalidBigInt(text.to_string()))
}

fn parse_boolean(text: &str) -> Result<Value, CoercionCause> {
    match text {
        "true" => Ok(Value::Boolean(true)),
        "false" => Ok(Value::Boolean(false)),
        _ => Err(CoercionCause::InvalidBoolean(text.to_string())),
    }
}

fn parse_bytes(text: &str) -> Result<Value, CoercionCause> {
    if let Ok(address) = UnshieldedAddress::from_bech32m(text) {
        return Ok(Value::Bytes(address.as_bytes().to_vec()));
    }
    decode_hex(text)
        .map(Value::Bytes)
        .map_err(|reason| CoercionCause::InvalidBytes {
            input: text.to_string(),
            reason,
        })
}

fn decode_hex(text: &str) -> Result<Vec<u8>, String> {
    let digits = text.strip_prefix("0x").unwrap_or(text);
    hex::decode(digits).map_err(|err| match err {
        hex::FromHexError::InvalidHexCharacter { c, index } => {
            format!("Invalid hex-digit '{c}' found in source string at index {index}")
        }
        hex::FromHexError::OddLength => "Hex string must have an even number of digits".into(),
        other => other.to_string(),
    })
}
