//! Users and products: table descriptors, row types, request bodies and the name filter.

use crate::coerce;
use crate::error::ConfigError;
use crate::sql::{Column, PgBindValue, Table};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A flat record stored in one table, with a store-assigned id.
pub trait Entity: Serialize + Send + Sync + Unpin + 'static {
    /// Body accepted by POST and PUT, echoed back with the id.
    type Input: Serialize + DeserializeOwned + Send + Sync + 'static;

    const TABLE: Table;
    /// Nouns used in client-facing failure messages.
    const SINGULAR: &'static str;
    const PLURAL: &'static str;

    /// Parameter values in `TABLE.columns` order.
    fn bind_input(input: &Self::Input) -> Vec<PgBindValue>;
}

pub const USER_TABLE: Table = Table {
    name: "usuario",
    id: Column::new("id", "int8").read_as("int8"),
    name_column: "nome",
    columns: &[
        Column::new("nome", "text"),
        Column::new("idade", "int4").read_as("int4"),
    ],
};

pub const PRODUCT_TABLE: Table = Table {
    name: "produto",
    id: Column::new("id", "int8").read_as("int8"),
    name_column: "nome",
    columns: &[
        Column::new("nome", "text"),
        Column::new("preco", "numeric").read_as("float8"),
        Column::new("descricao", "text"),
    ],
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub nome: Option<String>,
    pub idade: Option<i32>,
}

/// User body. Documented keys are upper-case; the mobile client sends lower-case.
/// Serialized back with the documented keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "UserBody")]
pub struct UserInput {
    #[serde(rename = "NOME")]
    pub nome: Option<String>,
    #[serde(rename = "IDADE")]
    pub idade: Option<i32>,
}

/// Wire shape of a user body: both key spellings may appear in the same object.
/// The upper-case value wins unless it is absent or null.
#[derive(Deserialize)]
struct UserBody {
    #[serde(rename = "NOME", default, deserialize_with = "coerce::opt_string")]
    nome_upper: Option<String>,
    #[serde(default, deserialize_with = "coerce::opt_string")]
    nome: Option<String>,
    #[serde(rename = "IDADE", default, deserialize_with = "coerce::opt_i32")]
    idade_upper: Option<i32>,
    #[serde(default, deserialize_with = "coerce::opt_i32")]
    idade: Option<i32>,
}

impl From<UserBody> for UserInput {
    fn from(body: UserBody) -> Self {
        UserInput {
            nome: body.nome_upper.or(body.nome),
            idade: body.idade_upper.or(body.idade),
        }
    }
}

impl Entity for User {
    type Input = UserInput;

    const TABLE: Table = USER_TABLE;
    const SINGULAR: &'static str = "user";
    const PLURAL: &'static str = "users";

    fn bind_input(input: &UserInput) -> Vec<PgBindValue> {
        vec![
            PgBindValue::text(input.nome.as_deref()),
            PgBindValue::int(input.idade.map(i64::from)),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: i64,
    pub nome: Option<String>,
    pub preco: Option<f64>,
    pub descricao: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductInput {
    #[serde(default, deserialize_with = "coerce::opt_string")]
    pub nome: Option<String>,
    #[serde(default, deserialize_with = "coerce::opt_f64")]
    pub preco: Option<f64>,
    #[serde(default, deserialize_with = "coerce::opt_string")]
    pub descricao: Option<String>,
}

impl Entity for Product {
    type Input = ProductInput;

    const TABLE: Table = PRODUCT_TABLE;
    const SINGULAR: &'static str = "product";
    const PLURAL: &'static str = "products";

    fn bind_input(input: &ProductInput) -> Vec<PgBindValue> {
        vec![
            PgBindValue::text(input.nome.as_deref()),
            PgBindValue::float(input.preco),
            PgBindValue::text(input.descricao.as_deref()),
        ]
    }
}

/// Response for POST and PUT: the id plus the submitted fields, not re-read from the store.
#[derive(Debug, Serialize)]
pub struct Saved<I> {
    pub id: i64,
    #[serde(flatten)]
    pub fields: I,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Deleted {
    pub id: i64,
}

/// How the `nome` query filter treats rows whose name contains the needle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    #[default]
    Contains,
    /// Keeps rows whose name does NOT contain the needle. Legacy `/users` behavior.
    Excludes,
}

impl FromStr for MatchMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "contains" | "include" => Ok(MatchMode::Contains),
            "exclude" | "excludes" => Ok(MatchMode::Excludes),
            _ => Err(ConfigError::Invalid {
                key: "USERS_NAME_FILTER",
                value: s.to_string(),
            }),
        }
    }
}

/// Case-insensitive substring filter on an entity's name column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameFilter {
    pub needle: String,
    pub mode: MatchMode,
}

impl NameFilter {
    pub fn new(needle: impl Into<String>, mode: MatchMode) -> Self {
        NameFilter {
            needle: needle.into(),
            mode,
        }
    }

    /// An absent or empty `nome` query parameter means no filter.
    pub fn from_query(raw: Option<String>, mode: MatchMode) -> Option<Self> {
        raw.filter(|s| !s.is_empty()).map(|s| NameFilter::new(s, mode))
    }

    /// LIKE pattern with `\`, `%` and `_` escaped so the needle matches literally.
    pub fn like_pattern(&self) -> String {
        let mut out = String::with_capacity(self.needle.len() + 2);
        out.push('%');
        for c in self.needle.chars() {
            if matches!(c, '\\' | '%' | '_') {
                out.push('\\');
            }
            out.push(c);
        }
        out.push('%');
        out
    }
}
