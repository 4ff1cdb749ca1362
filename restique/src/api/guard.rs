//! Table name validation guard
//!
//! Every table-dependent route extracts [`ValidTable`] instead of a raw path
//! segment, so invalid names are rejected with 400 before a handler runs.

use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
    response::{IntoResponse, Response},
};
use std::collections::HashMap;

use crate::identifier::TableName;

/// Path parameter holding the table name
pub const TABLE_NAME_PARAM: &str = "table_name";

/// Extractor yielding the validated `{table_name}` path segment
#[derive(Debug, Clone)]
pub struct ValidTable(pub TableName);

impl<S> FromRequestParts<S> for ValidTable
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(params) = Path::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;

        let candidate = params.get(TABLE_NAME_PARAM).cloned().unwrap_or_default();

        TableName::new(candidate).map(ValidTable).map_err(|error| {
            tracing::warn!("Rejected table name: {}", error);
            error.into_response()
        })
    }
}

impl From<ValidTable> for TableName {
    fn from(table: ValidTable) -> Self {
        table.0
    }
}

