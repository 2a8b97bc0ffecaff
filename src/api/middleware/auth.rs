use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::{
    api::state::AppState,
    auth::{Identity, StaticPermissionService},
};

/// Resolve the bearer token to an identity and stash it in the request
/// extensions. Requests without a recognized token pass through without an
/// identity; the per-handler permission checks turn that into 401/403.
pub async fn attach_identity(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(token) = bearer_token(request.headers()) {
        if let Some(subject) = StaticPermissionService::subject_for(&state.settings.auth, &token) {
            request.extensions_mut().insert(Identity::new(subject, token));
        }
    }

    next.run(request).await
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_string)
}
