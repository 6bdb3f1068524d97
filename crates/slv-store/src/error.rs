//! Errors raised by event sources.

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("cannot connect to {target}: {source}")]
    Connect {
        target: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("query failed: {0}")]
    Query(#[from] sqlx::Error),

    #[error("cannot decode column `{column}`: {source}")]
    Decode {
        column: String,
        #[source]
        source: sqlx::Error,
    },
}
