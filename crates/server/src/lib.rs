use api_types::ApiResponse;
use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::IntoResponse,
};
use engine::{EngineError, ErrorKind};

pub use server::{AuthUser, ServerOptions, ServerState, router, run_with_listener};

mod expenses;
mod extract;
mod friend_requests;
mod friends;
mod server;
mod settlements;
mod split_expenses;
mod user;

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
    Unauthenticated,
}

/// Message of an internal failure, attached to the response so that the
/// router can reveal it when configured to.
#[derive(Clone, Debug)]
pub(crate) struct InternalDetail(pub(crate) String);

const INTERNAL_MESSAGE: &str = "internal server error";

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err.kind() {
        ErrorKind::Validation | ErrorKind::Conflict => StatusCode::BAD_REQUEST,
        ErrorKind::Authentication => StatusCode::UNAUTHORIZED,
        ErrorKind::Authorization => StatusCode::FORBIDDEN,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ServerError::Engine(err) if err.kind() == ErrorKind::Internal => {
                tracing::error!("internal error: {err}");
                let mut response = (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::error(INTERNAL_MESSAGE)),
                )
                    .into_response();
                response
                    .extensions_mut()
                    .insert(InternalDetail(err.to_string()));
                response
            }
            ServerError::Engine(err) => (
                status_for_engine_error(&err),
                Json(ApiResponse::error(err.to_string())),
            )
                .into_response(),
            ServerError::Generic(err) => {
                (StatusCode::BAD_REQUEST, Json(ApiResponse::error(err))).into_response()
            }
            ServerError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                Json(ApiResponse::error("missing or invalid credentials")),
            )
                .into_response(),
        }
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

impl From<JsonRejection> for ServerError {
    fn from(value: JsonRejection) -> Self {
        Self::Generic(value.body_text())
    }
}

impl From<QueryRejection> for ServerError {
    fn from(value: QueryRejection) -> Self {
        Self::Generic(value.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_unauthorized_maps_to_403() {
        let res =
            ServerError::from(EngineError::Unauthorized("owner only".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn not_friends_maps_to_403() {
        let res = ServerError::from(EngineError::NotFriends("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn engine_not_found_maps_to_404() {
        let res = ServerError::from(EngineError::KeyNotFound("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let res = ServerError::from(EngineError::RequestNotFound("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn engine_conflict_maps_to_400() {
        let res = ServerError::from(EngineError::AlreadyPendingOrFriends).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let res = ServerError::from(EngineError::ExistingKey("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn engine_validation_maps_to_400() {
        let res =
            ServerError::from(EngineError::SplitExceedsTotal("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn invalid_credentials_map_to_401() {
        let res = ServerError::from(EngineError::InvalidCredentials).into_response();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let res = ServerError::Unauthenticated.into_response();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn internal_errors_hide_their_message() {
        let res = ServerError::from(EngineError::Crypto("salt".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let detail = res.extensions().get::<InternalDetail>().unwrap();
        assert!(detail.0.contains("salt"));
    }

    #[test]
    fn generic_maps_to_400() {
        let res = ServerError::Generic("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
