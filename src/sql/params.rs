//! Values bound to PostgreSQL positional parameters.

use sqlx::encode::{Encode, IsNull};
use sqlx::postgres::{PgTypeInfo, Postgres};
use sqlx::{Database, Type};

/// A value that can be bound to a `$n` placeholder. Every variant travels as
/// TEXT; statements cast each placeholder to its column type (`$2::int4`).
#[derive(Clone, Debug, PartialEq)]
pub enum PgBindValue {
    Null,
    I64(i64),
    F64(f64),
    Text(String),
}

impl PgBindValue {
    pub fn text(v: Option<&str>) -> Self {
        v.map_or(PgBindValue::Null, |s| PgBindValue::Text(s.to_string()))
    }

    pub fn int(v: Option<i64>) -> Self {
        v.map_or(PgBindValue::Null, PgBindValue::I64)
    }

    pub fn float(v: Option<f64>) -> Self {
        v.map_or(PgBindValue::Null, PgBindValue::F64)
    }
}

impl<'q> Encode<'q, Postgres> for PgBindValue {
    fn encode_by_ref(
        &self,
        buf: &mut <Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, Box<dyn std::error::Error + Send + Sync>> {
        Ok(match self {
            PgBindValue::Null => IsNull::Yes,
            PgBindValue::I64(n) => {
                let n_str = n.to_string();
                <&str as Encode<Postgres>>::encode_by_ref(&n_str.as_str(), buf)?
            }
            PgBindValue::F64(n) => {
                let n_str = n.to_string();
                <&str as Encode<Postgres>>::encode_by_ref(&n_str.as_str(), buf)?
            }
            PgBindValue::Text(s) => {
                let s_ref: &str = s.as_str();
                <&str as Encode<Postgres>>::encode_by_ref(&s_ref, buf)?
            }
        })
    }
}

impl Type<Postgres> for PgBindValue {
    fn type_info() -> PgTypeInfo {
        <String as Type<Postgres>>::type_info()
    }
}
