//! Request extractors whose rejections answer with the JSON envelope.

use axum::extract::{FromRequest, FromRequestParts};

use crate::ServerError;

/// JSON request body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ServerError))]
pub(crate) struct JsonBody<T>(pub(crate) T);

/// Query string parameters.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ServerError))]
pub(crate) struct QueryParams<T>(pub(crate) T);
