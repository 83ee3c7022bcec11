//! Execution helpers for queries built by `shared::query`

use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::{Query, QueryAs, QueryScalar};
use sqlx::{FromRow, Postgres};

use shared::query::{SqlParam, SqlQuery};

/// Bind every parameter in order, matching its placeholder
macro_rules! bind_params {
    ($query:expr, $params:expr) => {{
        let mut query = $query;
        for param in $params {
            query = match param {
                SqlParam::Text(v) => query.bind(v),
                SqlParam::BigInt(v) => query.bind(v),
                SqlParam::Decimal(v) => query.bind(v),
                SqlParam::Date(v) => query.bind(v),
                SqlParam::TextArray(v) => query.bind(v),
                SqlParam::NullableTextArray(v) => query.bind(v),
                SqlParam::BigIntArray(v) => query.bind(v),
                SqlParam::DecimalArray(v) => query.bind(v),
                SqlParam::NullableDecimalArray(v) => query.bind(v),
                SqlParam::NullableDateArray(v) => query.bind(v),
            };
        }
        query
    }};
}

pub fn query(built: &SqlQuery) -> Query<'_, Postgres, PgArguments> {
    bind_params!(sqlx::query(&built.sql), built.params.iter().cloned())
}

pub fn query_as<'q, O>(built: &'q SqlQuery) -> QueryAs<'q, Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, PgRow>,
{
    bind_params!(sqlx::query_as::<_, O>(&built.sql), built.params.iter().cloned())
}

pub fn query_scalar<'q, O>(built: &'q SqlQuery) -> QueryScalar<'q, Postgres, O, PgArguments>
where
    (O,): for<'r> FromRow<'r, PgRow>,
{
    bind_params!(sqlx::query_scalar::<_, O>(&built.sql), built.params.iter().cloned())
}
