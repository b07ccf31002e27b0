use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use uuid::Uuid;

use crate::{
    apis::api_models::response::{FollowActionResponse, FollowerResponse, FollowingResponse},
    services::auth_service::Claims,
    utils::{errors::app_error::AppError, errors::error_payload::ErrorPayload, ids::parse_user_id},
    AppState,
};

const TAG: &str = "followers";

/// Follow a user
#[utoipa::path(
    post,
    tag = TAG,
    path = "/follow/{userId}",
    operation_id = "followUser",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "User followed successfully", body = FollowActionResponse),
        (status = 400, description = "Invalid id, self-follow or already following", body = ErrorPayload),
        (status = 401, description = "Missing or invalid token", body = ErrorPayload),
        (status = 404, description = "User not found", body = ErrorPayload),
        (status = 500, description = "Internal server error", body = ErrorPayload)
    ),
    params(
        ("userId" = Uuid, Path, description = "User ID to follow")
    )
)]
pub(super) async fn follow_user(
    State(app_state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let target_id = parse_user_id(&user_id)?;
    app_state
        .follow_service
        .follow(claims.id, target_id)
        .await?;
    Ok((
        StatusCode::OK,
        Json(FollowActionResponse::ok("You are now following this user")),
    ))
}

/// Unfollow a user
#[utoipa::path(
    post,
    tag = TAG,
    path = "/unfollow/{userId}",
    operation_id = "unfollowUser",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "User unfollowed, or was not followed", body = FollowActionResponse),
        (status = 400, description = "Invalid id or self-unfollow", body = ErrorPayload),
        (status = 401, description = "Missing or invalid token", body = ErrorPayload),
        (status = 404, description = "User not found", body = ErrorPayload),
        (status = 500, description = "Internal server error", body = ErrorPayload)
    ),
    params(
        ("userId" = Uuid, Path, description = "User ID to unfollow")
    )
)]
pub(super) async fn unfollow_user(
    State(app_state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let target_id = parse_user_id(&user_id)?;
    app_state
        .follow_service
        .unfollow(claims.id, target_id)
        .await?;
    Ok((
        StatusCode::OK,
        Json(FollowActionResponse::ok("You have unfollowed this user")),
    ))
}

/// Get the followers of a user
#[utoipa::path(
    get,
    tag = TAG,
    path = "/followers/{userId}",
    operation_id = "getFollowers",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of followers", body = Vec<FollowerResponse>),
        (status = 400, description = "Invalid user id", body = ErrorPayload),
        (status = 401, description = "Missing or invalid token", body = ErrorPayload),
        (status = 404, description = "User not found", body = ErrorPayload),
        (status = 500, description = "Internal server error", body = ErrorPayload)
    ),
    params(
        ("userId" = Uuid, Path, description = "User whose followers are listed")
    )
)]
pub(super) async fn get_followers(
    State(app_state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = parse_user_id(&user_id)?;
    let followers = app_state
        .follow_service
        .followers(user_id, claims.id)
        .await?;
    Ok((StatusCode::OK, Json(followers)))
}

/// Get the users a user follows
#[utoipa::path(
    get,
    tag = TAG,
    path = "/following/{userId}",
    operation_id = "getFollowing",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of followed users", body = Vec<FollowingResponse>),
        (status = 400, description = "Invalid user id", body = ErrorPayload),
        (status = 401, description = "Missing or invalid token", body = ErrorPayload),
        (status = 404, description = "User not found", body = ErrorPayload),
        (status = 500, description = "Internal server error", body = ErrorPayload)
    ),
    params(
        ("userId" = Uuid, Path, description = "User whose followings are listed")
    )
)]
pub(super) async fn get_following(
    State(app_state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = parse_user_id(&user_id)?;
    let following = app_state.follow_service.following(user_id).await?;
    Ok((StatusCode::OK, Json(following)))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
        Router,
    };
    use serde_json::Value;
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::{
        apis::setup_routes,
        models::users::{NewUser, User},
        repositories::memory_repository::InMemoryUserRepository,
        services::{auth_service::AuthService, follow_service::FollowService},
        AppState,
    };

    struct TestApp {
        router: Router,
        state: Arc<AppState>,
    }

    impl TestApp {
        fn new() -> Self {
            let state = Arc::new(AppState {
                follow_service: FollowService::new(Arc::new(InMemoryUserRepository::new())),
                auth_service: AuthService::new("handler-test-secret", 3_600),
            });
            Self {
                router: setup_routes(state.clone()),
                state,
            }
        }

        async fn user(&self, login: &str) -> (User, String) {
            let user = self
                .state
                .follow_service
                .register(NewUser {
                    first_name: format!("{login}-first"),
                    last_name: format!("{login}-last"),
                    login: login.to_string(),
                    email: format!("{login}@mindtrack.test"),
                    username: Some(login.to_string()),
                    avatar_url: None,
                })
                .await
                .unwrap();
            let token = self.state.auth_service.issue(&user).unwrap();
            (user, token)
        }

        async fn call(&self, method: Method, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
            let mut builder = Request::builder().method(method).uri(uri);
            if let Some(token) = token {
                builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
            }
            let req = builder.body(Body::empty()).unwrap();
            let resp = self.router.clone().oneshot(req).await.unwrap();
            let status = resp.status();
            let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024)
                .await
                .unwrap();
            let json = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).unwrap_or(Value::Null)
            };
            (status, json)
        }
    }

    #[tokio::test]
    async fn follow_list_and_unfollow_scenario() {
        let app = TestApp::new();
        let (u1, t1) = app.user("u1").await;
        let (u2, _) = app.user("u2").await;

        let (status, body) = app
            .call(Method::POST, &format!("/api/followers/follow/{}", u2.id), Some(&t1))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);

        let (status, body) = app
            .call(Method::GET, &format!("/api/followers/followers/{}", u2.id), Some(&t1))
            .await;
        assert_eq!(status, StatusCode::OK);
        let followers = body.as_array().unwrap();
        assert_eq!(followers.len(), 1);
        assert_eq!(followers[0]["id"], u1.id.to_string());
        assert_eq!(followers[0]["username"], "u1");
        assert_eq!(followers[0]["firstName"], "u1-first");
        assert_eq!(followers[0]["lastName"], "u1-last");
        assert_eq!(followers[0]["avatarUrl"], Value::Null);
        assert_eq!(followers[0]["following"], false);

        let (status, body) = app
            .call(Method::GET, &format!("/api/followers/following/{}", u1.id), Some(&t1))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["id"], u2.id.to_string());
        assert!(body[0].get("following").is_none());

        let (status, _) = app
            .call(Method::POST, &format!("/api/followers/unfollow/{}", u2.id), Some(&t1))
            .await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = app
            .call(Method::GET, &format!("/api/followers/followers/{}", u2.id), Some(&t1))
            .await;
        assert_eq!(body, Value::Array(vec![]));
        let (_, body) = app
            .call(Method::GET, &format!("/api/followers/following/{}", u1.id), Some(&t1))
            .await;
        assert_eq!(body, Value::Array(vec![]));
    }

    #[tokio::test]
    async fn rejected_follows_use_error_payload() {
        let app = TestApp::new();
        let (u1, t1) = app.user("u1").await;
        let (u2, _) = app.user("u2").await;

        let (status, body) = app
            .call(Method::POST, &format!("/api/followers/follow/{}", u1.id), Some(&t1))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["type"], "SELF_REFERENCE");
        assert_eq!(body["code"], 400);

        app.call(Method::POST, &format!("/api/followers/follow/{}", u2.id), Some(&t1))
            .await;
        let (status, body) = app
            .call(Method::POST, &format!("/api/followers/follow/{}", u2.id), Some(&t1))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["type"], "DUPLICATE_EDGE");

        let (status, body) = app
            .call(
                Method::POST,
                &format!("/api/followers/follow/{}", Uuid::new_v4()),
                Some(&t1),
            )
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["type"], "NOT_FOUND");

        let (status, body) = app
            .call(Method::POST, "/api/followers/follow/not-a-uuid", Some(&t1))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["type"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn unfollow_edge_cases() {
        let app = TestApp::new();
        let (u1, t1) = app.user("u1").await;
        let (u2, _) = app.user("u2").await;

        let (status, body) = app
            .call(Method::POST, &format!("/api/followers/unfollow/{}", u2.id), Some(&t1))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);

        let (status, body) = app
            .call(Method::POST, &format!("/api/followers/unfollow/{}", u1.id), Some(&t1))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "You cannot unfollow yourself");

        let (status, _) = app
            .call(
                Method::POST,
                &format!("/api/followers/unfollow/{}", Uuid::new_v4()),
                Some(&t1),
            )
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn requests_without_valid_token_are_unauthorized() {
        let app = TestApp::new();
        let (u1, _) = app.user("u1").await;
        let uri = format!("/api/followers/followers/{}", u1.id);

        let (status, body) = app.call(Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["type"], "UNAUTHORIZED");

        let (status, _) = app.call(Method::GET, &uri, Some("garbage")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let forged = AuthService::new("other-secret", 3_600).issue(&u1).unwrap();
        let (status, _) = app.call(Method::GET, &uri, Some(&forged)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn token_of_removed_user_cannot_follow() {
        let app = TestApp::new();
        let (u1, t1) = app.user("u1").await;
        let (u2, _) = app.user("u2").await;
        app.state.follow_service.remove_user(u1.id).await.unwrap();

        let (status, _) = app
            .call(Method::POST, &format!("/api/followers/follow/{}", u2.id), Some(&t1))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn health_does_not_require_a_token() {
        let app = TestApp::new();
        let (status, body) = app.call(Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }
}
