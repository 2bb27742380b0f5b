use crate::{Error, Result, Value};
use anyhow::Context;
use rust_decimal::{
    Decimal,
    prelude::{FromPrimitive, ToPrimitive},
};
use std::{any, borrow::Cow};
use time::{
    Date, OffsetDateTime, PrimitiveDateTime, Time, format_description::well_known::Rfc3339,
    macros::format_description,
};
use uuid::Uuid;

/// Conversion between native Rust types and the dynamic [`Value`].
///
/// `as_value` produces the canonical variant for the type. `try_from_value` accepts the canonical
/// variant and, where it is unambiguous, the loose representations produced by engines with weak
/// typing (integers for booleans, text for temporals, uuids and decimals).
///
/// ```rust
/// use stencil_core::{AsValue, Value};
/// assert_eq!(42i32.as_value(), Value::Int64(42));
/// let n: i32 = AsValue::try_from_value(Value::Int64(42)).unwrap();
/// assert_eq!(n, 42);
/// ```
pub trait AsValue {
    fn as_value(self) -> Value;
    fn try_from_value(value: Value) -> Result<Self>
    where
        Self: Sized;
}

fn mismatch<T>(value: &Value) -> Error {
    Error::msg(format!(
        "cannot convert a {} value into {}",
        value.kind(),
        any::type_name::<T>()
    ))
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Varchar(value.into())
    }
}

impl<T: AsValue> From<T> for Value {
    fn from(value: T) -> Self {
        value.as_value()
    }
}

macro_rules! impl_as_value_integer {
    ($($ty:ty),+) => {$(
        impl AsValue for $ty {
            fn as_value(self) -> Value {
                Value::Int64(self as i64)
            }
            fn try_from_value(value: Value) -> Result<Self> {
                let integer = match &value {
                    Value::Int64(v) => *v,
                    Value::Boolean(v) => *v as i64,
                    Value::Decimal(v) if v.fract().is_zero() => v
                        .to_i64()
                        .ok_or_else(|| mismatch::<Self>(&value))?,
                    Value::Varchar(v) => v
                        .trim()
                        .parse::<i64>()
                        .with_context(|| {
                            format!("cannot parse `{}` as {}", v, any::type_name::<Self>())
                        })?,
                    _ => return Err(mismatch::<Self>(&value)),
                };
                <$ty>::try_from(integer).map_err(|_| {
                    Error::msg(format!(
                        "value {} is out of range for {}",
                        integer,
                        any::type_name::<Self>()
                    ))
                })
            }
        }
    )+};
}

impl_as_value_integer!(i8, i16, i32, i64, isize, u8, u16, u32);

/// Unsigned integers wider than `i64` are carried as `Decimal` above `i64::MAX`.
macro_rules! impl_as_value_unsigned {
    ($($ty:ty),+) => {$(
        impl AsValue for $ty {
            fn as_value(self) -> Value {
                match i64::try_from(self) {
                    Ok(v) => Value::Int64(v),
                    Err(..) => Value::Decimal(Decimal::from(self)),
                }
            }
            fn try_from_value(value: Value) -> Result<Self> {
                let integer = if let Value::Decimal(v) = &value {
                    v.fract()
                        .is_zero()
                        .then(|| v.to_u64())
                        .flatten()
                        .ok_or_else(|| mismatch::<Self>(&value))?
                } else {
                    let signed = i64::try_from_value(value)?;
                    u64::try_from(signed).map_err(|_| {
                        Error::msg(format!(
                            "value {} is out of range for {}",
                            signed,
                            any::type_name::<Self>()
                        ))
                    })?
                };
                <$ty>::try_from(integer).map_err(|_| {
                    Error::msg(format!(
                        "value {} is out of range for {}",
                        integer,
                        any::type_name::<Self>()
                    ))
                })
            }
        }
    )+};
}

impl_as_value_unsigned!(u64, usize);

macro_rules! impl_as_value_float {
    ($($ty:ty),+) => {$(
        impl AsValue for $ty {
            fn as_value(self) -> Value {
                Value::Float64(self as f64)
            }
            fn try_from_value(value: Value) -> Result<Self> {
                Ok(match &value {
                    Value::Float64(v) => *v as $ty,
                    Value::Int64(v) => *v as $ty,
                    Value::Decimal(v) => v.to_f64().ok_or_else(|| mismatch::<Self>(&value))? as $ty,
                    Value::Varchar(v) => v
                        .trim()
                        .parse::<$ty>()
                        .with_context(|| {
                            format!("cannot parse `{}` as {}", v, any::type_name::<Self>())
                        })?,
                    _ => return Err(mismatch::<Self>(&value)),
                })
            }
        }
    )+};
}

impl_as_value_float!(f32, f64);

impl AsValue for bool {
    fn as_value(self) -> Value {
        Value::Boolean(self)
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match &value {
            Value::Boolean(v) => Ok(*v),
            Value::Int64(0) => Ok(false),
            Value::Int64(1) => Ok(true),
            Value::Varchar(v) => match v.trim() {
                "true" | "t" | "1" => Ok(true),
                "false" | "f" | "0" => Ok(false),
                _ => Err(mismatch::<Self>(&value)),
            },
            _ => Err(mismatch::<Self>(&value)),
        }
    }
}

impl AsValue for String {
    fn as_value(self) -> Value {
        Value::Varchar(self)
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Varchar(v) => Ok(v),
            Value::Blob(v) => String::from_utf8(v).context("the blob is not valid UTF-8"),
            _ => Err(mismatch::<Self>(&value)),
        }
    }
}

impl AsValue for Cow<'static, str> {
    fn as_value(self) -> Value {
        Value::Varchar(self.into_owned())
    }
    fn try_from_value(value: Value) -> Result<Self> {
        String::try_from_value(value).map(Cow::Owned)
    }
}

impl AsValue for Vec<u8> {
    fn as_value(self) -> Value {
        Value::Blob(self)
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Blob(v) => Ok(v),
            Value::Varchar(v) => Ok(v.into_bytes()),
            _ => Err(mismatch::<Self>(&value)),
        }
    }
}

impl AsValue for Uuid {
    fn as_value(self) -> Value {
        Value::Uuid(self)
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match &value {
            Value::Uuid(v) => Ok(*v),
            Value::Varchar(v) => {
                Uuid::parse_str(v.trim()).with_context(|| format!("cannot parse `{v}` as Uuid"))
            }
            Value::Blob(v) => Uuid::from_slice(v).context("the blob is not a 16 bytes Uuid"),
            _ => Err(mismatch::<Self>(&value)),
        }
    }
}

impl AsValue for Decimal {
    fn as_value(self) -> Value {
        Value::Decimal(self)
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match &value {
            Value::Decimal(v) => Ok(*v),
            Value::Int64(v) => Ok(Decimal::from(*v)),
            Value::Float64(v) => Decimal::from_f64(*v).ok_or_else(|| mismatch::<Self>(&value)),
            Value::Varchar(v) => v
                .trim()
                .parse::<Decimal>()
                .with_context(|| format!("cannot parse `{v}` as Decimal")),
            _ => Err(mismatch::<Self>(&value)),
        }
    }
}

fn parse_date(value: &str) -> Result<Date> {
    Date::parse(value, format_description!("[year]-[month]-[day]"))
        .with_context(|| format!("cannot parse `{value}` as Date"))
}

fn parse_time(value: &str) -> Result<Time> {
    Time::parse(
        value,
        format_description!("[hour]:[minute]:[second].[subsecond]"),
    )
    .or_else(|_| Time::parse(value, format_description!("[hour]:[minute]:[second]")))
    .or_else(|_| Time::parse(value, format_description!("[hour]:[minute]")))
    .with_context(|| format!("cannot parse `{value}` as Time"))
}

fn parse_timestamp(value: &str) -> Result<PrimitiveDateTime> {
    let (date, time) = value
        .split_once([' ', 'T'])
        .ok_or_else(|| Error::msg(format!("cannot parse `{value}` as PrimitiveDateTime")))?;
    Ok(PrimitiveDateTime::new(parse_date(date)?, parse_time(time)?))
}

fn parse_timestamptz(value: &str) -> Result<OffsetDateTime> {
    OffsetDateTime::parse(value, &Rfc3339)
        .or_else(|_| {
            OffsetDateTime::parse(
                value,
                format_description!(
                    "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond][offset_hour sign:mandatory]:[offset_minute]"
                ),
            )
        })
        .or_else(|_| {
            OffsetDateTime::parse(
                value,
                format_description!(
                    "[year]-[month]-[day] [hour]:[minute]:[second][offset_hour sign:mandatory]:[offset_minute]"
                ),
            )
        })
        .with_context(|| format!("cannot parse `{value}` as OffsetDateTime"))
}

impl AsValue for Date {
    fn as_value(self) -> Value {
        Value::Date(self)
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match &value {
            Value::Date(v) => Ok(*v),
            Value::Varchar(v) => parse_date(v.trim()),
            _ => Err(mismatch::<Self>(&value)),
        }
    }
}

impl AsValue for Time {
    fn as_value(self) -> Value {
        Value::Time(self)
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match &value {
            Value::Time(v) => Ok(*v),
            Value::Varchar(v) => parse_time(v.trim()),
            _ => Err(mismatch::<Self>(&value)),
        }
    }
}

impl AsValue for PrimitiveDateTime {
    fn as_value(self) -> Value {
        Value::Timestamp(self)
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match &value {
            Value::Timestamp(v) => Ok(*v),
            Value::Varchar(v) => parse_timestamp(v.trim()),
            _ => Err(mismatch::<Self>(&value)),
        }
    }
}

impl AsValue for OffsetDateTime {
    fn as_value(self) -> Value {
        Value::TimestampWithTimezone(self)
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match &value {
            Value::TimestampWithTimezone(v) => Ok(*v),
            Value::Timestamp(v) => Ok(v.assume_utc()),
            Value::Varchar(v) => parse_timestamptz(v.trim()),
            _ => Err(mismatch::<Self>(&value)),
        }
    }
}

impl<T: AsValue> AsValue for Option<T> {
    fn as_value(self) -> Value {
        match self {
            Some(v) => v.as_value(),
            None => Value::Null,
        }
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            v => T::try_from_value(v).map(Some),
        }
    }
}

impl<T: AsValue> AsValue for Box<T> {
    fn as_value(self) -> Value {
        (*self).as_value()
    }
    fn try_from_value(value: Value) -> Result<Self> {
        T::try_from_value(value).map(Box::new)
    }
}
