//! Shared helpers and macros for Diesel repository implementations.

use diesel::sql_types::Text;

diesel::define_sql_function! {
    /// SQL `lower()`, matching the case-insensitive username index.
    fn lower(value: Text) -> Text;
}

/// Collect row conversion results, mapping the first error through `map_err`.
pub(crate) fn collect_rows<T, E>(
    results: impl Iterator<Item = Result<T, String>>,
    map_err: impl FnOnce(String) -> E,
) -> Result<Vec<T>, E> {
    results.collect::<Result<Vec<_>, _>>().map_err(map_err)
}

/// Load at most one row and convert it with `TryFrom`.
///
/// Expands to a `Result<Option<T>, E>` where `E` is the calling repository's
/// port error.
macro_rules! load_optional {
    ($self:ident, $query:expr, $row:ty) => {{
        use diesel::prelude::*;
        use diesel_async::RunQueryDsl;
        use $crate::outbound::persistence::diesel_error_mapping::{
            map_diesel_error, map_pool_error, map_row_error,
        };

        let mut conn = $self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<$row> = $query
            .select(<$row>::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(TryInto::try_into).transpose().map_err(map_row_error)?)
    }};
}

/// Load every row of an ordered query and convert each with `TryFrom`.
macro_rules! load_vec {
    ($self:ident, $query:expr, $row:ty) => {{
        use diesel::prelude::*;
        use diesel_async::RunQueryDsl;
        use $crate::outbound::persistence::diesel_error_mapping::{
            map_diesel_error, map_pool_error, map_row_error,
        };
        use $crate::outbound::persistence::diesel_helpers::collect_rows;

        let mut conn = $self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<$row> = $query
            .select(<$row>::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(collect_rows(rows.into_iter().map(TryInto::try_into), map_row_error)?)
    }};
}

pub(crate) use {load_optional, load_vec};
