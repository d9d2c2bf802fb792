//! Server-rendered todo input form and the GraphQL mutation that inserts todos.
//!
//! [`TodoInput`] renders the form, [`ADD_TODO`] describes the insert operation and
//! [`ExecuteMutation`] is the seam through which a host runs it against a GraphQL endpoint.

mod components;
mod config;
mod graphql;
mod html;
mod host;
mod result;
mod todo;

pub use components::*;
pub use config::*;
pub use graphql::*;
pub use html::*;
pub use host::*;
pub use result::*;
pub use todo::*;

pub use async_trait::async_trait;
pub use axum::{
    self,
    body::Body,
    http::{self, header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
pub use once_cell::sync::Lazy;
pub use serde::{Deserialize, Serialize};
pub use serde_json::json;
pub use std::{env, sync::Arc};
pub use tracing::{debug, error, info, trace, warn};

/// A little helper to init router and route in a single call to improve formatting
pub fn route<S: Clone + Send + Sync + 'static>(
    path: &str,
    method_router: axum::routing::MethodRouter<S>,
) -> Router<S> {
    Router::<S>::new().route(path, method_router)
}
