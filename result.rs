use crate::*;

/// Basic Result alias with [`enum@crate::Error`]
pub type Result<T = (), E = Error> = std::result::Result<T, E>;

use thiserror::Error;
/// Error type used across the crate
#[derive(Error, Debug)]
pub enum Error {
    #[error("Todo title must not be empty")]
    EmptyTitle,
    #[error("GraphQL errors: {}", join_messages(.0))]
    GraphQl(Vec<GraphQlError>),
    #[error("GraphQL response carried no data")]
    MissingData,
    #[error("Invalid value for header {0}")]
    InvalidHeader(String),
    #[error("GraphQL endpoint responded with status {0}")]
    Status(u16),
    #[error("Operation selects no fields")]
    EmptySelection,
    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    IO(#[from] std::io::Error),
}

fn join_messages(errors: &[GraphQlError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graphql_errors_are_joined_in_display() {
        let err = Error::GraphQl(vec![
            GraphQlError::new("field 'insert_todos' not found"),
            GraphQlError::new("permission denied"),
        ]);
        assert_eq!(
            err.to_string(),
            "GraphQL errors: field 'insert_todos' not found; permission denied"
        );
    }
}
