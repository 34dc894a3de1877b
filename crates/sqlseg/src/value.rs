//! Bound argument values.

use std::error::Error;

use bytes::BytesMut;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use tokio_postgres::types::{IsNull, ToSql, Type};
use uuid::Uuid;

/// A value bound to a placeholder.
///
/// Segments own their arguments so they can be shared and rebuilt freely;
/// the argument store of a build is a list of these.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Date(NaiveDate),
    Timestamp(NaiveDateTime),
    TimestampTz(DateTime<Utc>),
    Uuid(Uuid),
    Json(serde_json::Value),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Render the value as an SQL literal, for logging only.
    ///
    /// Strings are single-quoted with embedded quotes doubled; timestamps use
    /// microsecond precision. Never execute the result.
    pub fn to_sql_inline(&self) -> String {
        match self {
            Self::Null => "NULL".to_string(),
            Self::Bool(true) => "TRUE".to_string(),
            Self::Bool(false) => "FALSE".to_string(),
            Self::Int(n) => n.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Text(s) => quote(s),
            Self::Bytes(b) => {
                let hex: String = b.iter().map(|byte| format!("{byte:02x}")).collect();
                format!("'\\x{hex}'")
            }
            Self::Date(d) => quote(&d.format("%Y-%m-%d").to_string()),
            Self::Timestamp(t) => quote(&t.format("%Y-%m-%d %H:%M:%S%.6f").to_string()),
            Self::TimestampTz(t) => quote(&t.format("%Y-%m-%d %H:%M:%S%.6f%:z").to_string()),
            Self::Uuid(u) => quote(&u.to_string()),
            Self::Json(j) => quote(&j.to_string()),
        }
    }
}

fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

impl ToSql for Value {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self {
            Self::Null => Ok(IsNull::Yes),
            Self::Bool(v) => v.to_sql_checked(ty, out),
            // Integers narrow to the declared parameter type.
            Self::Int(v) => match *ty {
                Type::INT2 => i16::try_from(*v)?.to_sql_checked(ty, out),
                Type::INT4 => i32::try_from(*v)?.to_sql_checked(ty, out),
                Type::FLOAT4 => (exact_int(*v, F32_EXACT)? as f32).to_sql_checked(ty, out),
                Type::FLOAT8 => (exact_int(*v, F64_EXACT)? as f64).to_sql_checked(ty, out),
                _ => v.to_sql_checked(ty, out),
            },
            // Rounding to the nearest FLOAT4 is what the column does anyway;
            // only values outside its range are rejected.
            Self::Float(v) => match *ty {
                Type::FLOAT4 => {
                    let narrowed = *v as f32;
                    if v.is_finite() && narrowed.is_infinite() {
                        return Err(format!("{v} is out of range for type real").into());
                    }
                    narrowed.to_sql_checked(ty, out)
                }
                _ => v.to_sql_checked(ty, out),
            },
            Self::Text(v) => v.to_sql_checked(ty, out),
            Self::Bytes(v) => v.to_sql_checked(ty, out),
            Self::Date(v) => v.to_sql_checked(ty, out),
            Self::Timestamp(v) => v.to_sql_checked(ty, out),
            Self::TimestampTz(v) => v.to_sql_checked(ty, out),
            Self::Uuid(v) => v.to_sql_checked(ty, out),
            Self::Json(v) => v.to_sql_checked(ty, out),
        }
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }

    tokio_postgres::types::to_sql_checked!();
}

/// Integers up to these magnitudes convert to the float type without loss.
const F32_EXACT: u64 = 1 << 24;
const F64_EXACT: u64 = 1 << 53;

fn exact_int(v: i64, limit: u64) -> Result<i64, Box<dyn Error + Sync + Send>> {
    if v.unsigned_abs() > limit {
        return Err(format!("{v} cannot be represented exactly as a float parameter").into());
    }
    Ok(v)
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Self::$variant(v.into())
                }
            }
        )*
    };
}

impl_from! {
    bool => Bool,
    i8 => Int,
    i16 => Int,
    i32 => Int,
    i64 => Int,
    u8 => Int,
    u16 => Int,
    u32 => Int,
    f32 => Float,
    f64 => Float,
    String => Text,
    &str => Text,
    Vec<u8> => Bytes,
    &[u8] => Bytes,
    NaiveDate => Date,
    NaiveDateTime => Timestamp,
    DateTime<Utc> => TimestampTz,
    Uuid => Uuid,
    serde_json::Value => Json,
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Self::Text(v.clone())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}
