use super::{ScalarTy, Type, Value};
use crate::{Error, Result};
use chrono::NaiveDateTime;

/// Conversion from a [`Value`] into a concrete field type.
///
/// Field setters in the entity registry go through this trait, so a value
/// read from the store is first [coerced](Value::coerce) to the field's
/// declared [`Type`] and then unwrapped here.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self>;
}

/// Conversion of a field into a [`Value`].
pub trait IntoValue {
    fn into_value(self) -> Value;
}

impl<T: Into<Value>> IntoValue for T {
    fn into_value(self) -> Value {
        self.into()
    }
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self> {
        Ok(value)
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Bool(v) => Ok(v),
            Value::I64(v) => Ok(v != 0),
            value => Err(Error::type_conversion(value, "bool")),
        }
    }
}

impl FromValue for i64 {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::I64(v) => Ok(v),
            Value::Bool(v) => Ok(v as i64),
            value => Err(Error::type_conversion(value, "i64")),
        }
    }
}

impl FromValue for i32 {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::I64(v) => i32::try_from(v).map_err(|_| Error::type_conversion(Value::I64(v), "i32")),
            Value::Bool(v) => Ok(v as i32),
            value => Err(Error::type_conversion(value, "i32")),
        }
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::F64(v) => Ok(v),
            Value::I64(v) => Ok(v as f64),
            value => Err(Error::type_conversion(value, "f64")),
        }
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::String(v) => Ok(v),
            value => Err(Error::type_conversion(value, "String")),
        }
    }
}

impl FromValue for NaiveDateTime {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::DateTime(v) => Ok(v),
            value => Err(Error::type_conversion(value, "NaiveDateTime")),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            value => T::from_value(value).map(Some),
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(vec![]),
            Value::List(items) => items.into_iter().map(T::from_value).collect(),
            value => Err(Error::type_conversion(value, "Vec")),
        }
    }
}

impl Value {
    /// Coerces a value read from the store into the shape a field of type
    /// `ty` expects.
    ///
    /// Numbers, booleans and text convert between each other where the
    /// meaning is unambiguous; comma-separated text becomes a list when the
    /// field is a list. Null stays null.
    pub fn coerce(self, ty: Type) -> Result<Value> {
        match ty {
            Type::Scalar(scalar) => self.coerce_scalar(scalar),
            Type::Enum => self.coerce_scalar(ScalarTy::I64),
            Type::List(item) => match self {
                Value::Null => Ok(Value::Null),
                Value::List(items) => items
                    .into_iter()
                    .map(|item_value| item_value.coerce_scalar(item))
                    .collect::<Result<Vec<_>>>()
                    .map(Value::List),
                Value::String(csv) => csv
                    .split(',')
                    .filter(|token| !token.is_empty())
                    .map(|token| Value::String(token.to_string()).coerce_scalar(item))
                    .collect::<Result<Vec<_>>>()
                    .map(Value::List),
                value => value.coerce_scalar(item).map(|v| Value::List(vec![v])),
            },
        }
    }

    fn coerce_scalar(self, ty: ScalarTy) -> Result<Value> {
        use ScalarTy::*;

        match (ty, self) {
            (_, Value::Null) => Ok(Value::Null),

            (Bool, Value::Bool(v)) => Ok(Value::Bool(v)),
            (Bool, Value::I64(v)) => Ok(Value::Bool(v != 0)),
            (Bool, Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Ok(Value::Bool(true)),
                "false" | "0" => Ok(Value::Bool(false)),
                _ => Err(Error::type_conversion(Value::String(s), "bool")),
            },

            (I64, Value::I64(v)) => Ok(Value::I64(v)),
            (I64, Value::Bool(v)) => Ok(Value::I64(v as i64)),
            (I64, Value::F64(v)) if v.fract() == 0.0 => Ok(Value::I64(v as i64)),
            (I64, Value::String(s)) => match s.trim().parse::<i64>() {
                Ok(v) => Ok(Value::I64(v)),
                Err(_) => Err(Error::type_conversion(Value::String(s), "i64")),
            },

            (F64, Value::F64(v)) => Ok(Value::F64(v)),
            (F64, Value::I64(v)) => Ok(Value::F64(v as f64)),
            (F64, Value::String(s)) => match s.trim().parse::<f64>() {
                Ok(v) => Ok(Value::F64(v)),
                Err(_) => Err(Error::type_conversion(Value::String(s), "f64")),
            },

            (String, Value::String(s)) => Ok(Value::String(s)),
            (String, value @ (Value::Bool(_) | Value::I64(_) | Value::F64(_) | Value::DateTime(_))) => {
                Ok(Value::String(value.to_text().unwrap_or_default()))
            }

            (DateTime, Value::DateTime(v)) => Ok(Value::DateTime(v)),
            (DateTime, Value::String(s)) => match super::value_datetime::parse(&s) {
                Some(v) => Ok(Value::DateTime(v)),
                None => Err(Error::type_conversion(Value::String(s), "NaiveDateTime")),
            },

            (ty, value) => Err(Error::type_conversion(value, ty.name())),
        }
    }
}

impl ScalarTy {
    fn name(self) -> &'static str {
        match self {
            ScalarTy::Bool => "bool",
            ScalarTy::I64 => "i64",
            ScalarTy::F64 => "f64",
            ScalarTy::String => "String",
            ScalarTy::DateTime => "NaiveDateTime",
        }
    }
}
