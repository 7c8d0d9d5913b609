//! FromValue trait for converting catalog values to Rust types

use crate::error::{Error, Result};
use crate::value::Value;

/// Trait for types that can be constructed from a database value.
pub trait FromValue: Sized {
    /// Convert a database value to this type.
    fn from_value(value: Value) -> Result<Self>;
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Bool(v) => Ok(v),
            Value::I64(v) => Ok(v != 0),
            Value::U64(v) => Ok(v != 0),
            Value::String(ref s) => match s.to_ascii_uppercase().as_str() {
                "YES" | "TRUE" | "1" => Ok(true),
                "NO" | "FALSE" | "0" => Ok(false),
                _ => Err(Error::TypeConversion {
                    expected: "bool",
                    actual: format!("string({})", s),
                }),
            },
            Value::Null => Err(Error::UnexpectedNull(String::new())),
            _ => Err(Error::TypeConversion {
                expected: "bool",
                actual: value.type_name().to_string(),
            }),
        }
    }
}

impl FromValue for i64 {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::I64(v) => Ok(v),
            Value::U64(v) => v.try_into().map_err(|_| Error::TypeConversion {
                expected: "i64",
                actual: format!("u64({}) out of range", v),
            }),
            Value::String(ref s) => s.parse().map_err(|_| Error::TypeConversion {
                expected: "i64",
                actual: format!("string({})", s),
            }),
            Value::Null => Err(Error::UnexpectedNull(String::new())),
            _ => Err(Error::TypeConversion {
                expected: "i64",
                actual: value.type_name().to_string(),
            }),
        }
    }
}

impl FromValue for u64 {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::U64(v) => Ok(v),
            Value::I64(v) => v.try_into().map_err(|_| Error::TypeConversion {
                expected: "u64",
                actual: format!("i64({}) out of range", v),
            }),
            Value::String(ref s) => s.parse().map_err(|_| Error::TypeConversion {
                expected: "u64",
                actual: format!("string({})", s),
            }),
            Value::Null => Err(Error::UnexpectedNull(String::new())),
            _ => Err(Error::TypeConversion {
                expected: "u64",
                actual: value.type_name().to_string(),
            }),
        }
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::String(v) => Ok(v),
            Value::I64(v) => Ok(v.to_string()),
            Value::U64(v) => Ok(v.to_string()),
            Value::F32(v) => Ok(v.to_string()),
            Value::F64(v) => Ok(v.to_string()),
            Value::Bool(v) => Ok(v.to_string()),
            Value::Bytes(v) => String::from_utf8(v).map_err(|e| Error::TypeConversion {
                expected: "utf-8 string",
                actual: e.to_string(),
            }),
            Value::Null => Err(Error::UnexpectedNull(String::new())),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self> {
        if value.is_null() {
            Ok(None)
        } else {
            T::from_value(value).map(Some)
        }
    }
}
