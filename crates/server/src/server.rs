use axum::{
    Json, Router,
    extract::{Request, State},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post, put},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
    typed_header::TypedHeaderRejection,
};

use std::sync::Arc;

use api_types::ApiResponse;
use engine::{Engine, EngineError, User};

use crate::{
    InternalDetail, ServerError, expenses, friend_requests, friends, settlements,
    split_expenses, user,
};

/// Runtime switches of the HTTP layer.
#[derive(Clone, Copy, Debug, Default)]
pub struct ServerOptions {
    /// Send the real message of internal errors instead of a generic one.
    pub expose_internal_errors: bool,
}

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub options: ServerOptions,
}

/// The caller resolved by [`auth`], available to private handlers.
#[derive(Clone, Debug)]
pub struct AuthUser(pub User);

async fn auth(
    auth_header: Result<TypedHeader<Authorization<Basic>>, TypedHeaderRejection>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let Ok(TypedHeader(auth_header)) = auth_header else {
        return Err(ServerError::Unauthenticated);
    };
    if auth_header.username().is_empty() || auth_header.password().is_empty() {
        return Err(ServerError::Unauthenticated);
    }

    let user = match state
        .engine
        .authenticate(auth_header.username(), auth_header.password())
        .await
    {
        Ok(user) => user,
        Err(EngineError::InvalidCredentials) => return Err(ServerError::Unauthenticated),
        Err(err) => return Err(err.into()),
    };

    request.extensions_mut().insert(AuthUser(user));
    Ok(next.run(request).await)
}

/// Swap the generic body of an internal error for its detail when enabled.
async fn reveal_internal_errors(
    State(state): State<ServerState>,
    mut response: Response,
) -> Response {
    let detail = response.extensions_mut().remove::<InternalDetail>();
    match detail {
        Some(InternalDetail(detail)) if state.options.expose_internal_errors => {
            (response.status(), Json(ApiResponse::error(detail))).into_response()
        }
        _ => response,
    }
}

pub fn router(state: ServerState) -> Router {
    let public = Router::new()
        .route("/user/register", post(user::register))
        .route("/user/login", post(user::login));

    let private = Router::new()
        .route("/user/info", get(user::info))
        .route("/user/list", get(user::list))
        .route("/user/update", put(user::update))
        .route("/user/avatar", patch(user::update_avatar))
        .route("/friendRequest/send", post(friend_requests::send))
        .route("/friendRequest/accept", post(friend_requests::accept))
        .route("/friendRequest/list", get(friend_requests::list))
        .route("/friendRequest/reject", delete(friend_requests::reject))
        .route("/friendRequest/remove", delete(friend_requests::remove))
        .route("/friend/list", get(friends::list))
        .route("/friend/individual", get(friends::individual))
        .route("/friend/balance", get(friends::balance))
        .route("/expense/create", post(expenses::create))
        .route("/expense/update", put(expenses::update))
        .route("/expense/delete", delete(expenses::delete))
        .route("/expense/all", get(expenses::list))
        .route("/splitExpense/create", post(split_expenses::create))
        .route("/splitExpense/update", put(split_expenses::update))
        .route("/splitExpense/delete", delete(split_expenses::delete))
        .route("/settleExpense/send", post(settlements::send))
        .route("/settleExpense/accept", post(settlements::accept))
        .route("/settleExpense/reject", delete(settlements::reject))
        .route("/settleExpense/remove", delete(settlements::remove))
        .route("/settleExpense/list", get(settlements::list))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth));

    Router::new()
        .merge(public)
        .merge(private)
        .layer(middleware::map_response_with_state(
            state.clone(),
            reveal_internal_errors,
        ))
        .with_state(state)
}

pub async fn run_with_listener(
    engine: Engine,
    options: ServerOptions,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
        options,
    };

    axum::serve(listener, router(state)).await
}
