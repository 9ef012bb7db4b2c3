//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{routing::get, Router};
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::modules::health::{self, HealthState};
use super::modules::users::{self, UserHandlerState};
use crate::application::UserAccountService;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Users
        users::list_users,
        users::get_user,
        users::get_user_by_name,
        users::create_user,
        users::update_user,
        users::delete_user,
        // Roles
        users::list_roles,
    ),
    components(
        schemas(
            health::HealthResponse,
            health::ComponentHealth,
            users::UserDto,
            users::RoleDto,
            users::CreateUserRequest,
            users::UpdateUserRequest,
        )
    ),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Users", description = "User account administration"),
        (name = "Roles", description = "Roles that can be granted to users"),
    ),
    info(
        title = "User Admin API",
        description = "Create, list, edit and delete user accounts and their roles",
    )
)]
pub struct ApiDoc;

/// Build the REST API router.
pub fn create_api_router(db: DatabaseConnection, user_service: Arc<UserAccountService>) -> Router {
    let health_state = HealthState {
        db,
        started_at: Arc::new(Instant::now()),
    };
    let user_state = UserHandlerState { user_service };

    let user_routes = Router::new()
        .route("/", get(users::list_users).post(users::create_user))
        .route(
            "/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route("/by-name/{name}", get(users::get_user_by_name))
        .with_state(user_state.clone());

    let role_routes = Router::new()
        .route("/", get(users::list_roles))
        .with_state(user_state);

    let health_routes = Router::new()
        .route("/", get(health::health_check))
        .with_state(health_state);

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api/v1/health", health_routes)
        .nest("/api/v1/users", user_routes)
        .nest("/api/v1/roles", role_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::domain::{ROLE_ADMIN, ROLE_USER};
    use crate::infrastructure::crypto::password::MIN_COST;
    use crate::infrastructure::database::test_support::migrated_db;
    use crate::infrastructure::database::SeaOrmRepositoryProvider;

    async fn app() -> Router {
        let db = migrated_db().await;
        let repos = Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
        let service = Arc::new(UserAccountService::new(repos).with_hash_cost(MIN_COST));
        create_api_router(db, service)
    }

    async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(serde_json::to_vec(&json).unwrap())
            }
            None => Body::empty(),
        };
        app.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
    }

    async fn json_body(resp: Response) -> Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn create_alice(app: &Router) -> i64 {
        let resp = call(
            app,
            "POST",
            "/api/v1/users",
            Some(json!({
                "name": "alice",
                "email": "a@x.com",
                "password": "secret",
                "roles": [ROLE_USER]
            })),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        json_body(resp).await["data"]["id"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn create_then_fetch_user_without_password() {
        let app = app().await;
        let id = create_alice(&app).await;

        let resp = call(&app, "GET", &format!("/api/v1/users/{id}"), None).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = json_body(resp).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["name"], "alice");
        assert_eq!(body["data"]["roles"], json!([ROLE_USER]));
        assert!(body["data"].get("password").is_none());

        let resp = call(&app, "GET", "/api/v1/users/by-name/alice", None).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_user_is_404() {
        let app = app().await;

        let resp = call(&app, "GET", "/api/v1/users/777", None).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(resp).await["success"], false);

        let resp = call(&app, "GET", "/api/v1/users/by-name/nobody", None).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = call(&app, "PUT", "/api/v1/users/777", Some(json!({"roles": []}))).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unknown_role_is_400() {
        let app = app().await;

        let resp = call(
            &app,
            "POST",
            "/api/v1/users",
            Some(json!({
                "name": "bob",
                "email": "b@x.com",
                "password": "pw",
                "roles": ["ROLE_ROOT"]
            })),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = call(&app, "GET", "/api/v1/users", None).await;
        assert_eq!(json_body(resp).await["data"], json!([]));
    }

    #[tokio::test]
    async fn invalid_body_is_422_and_duplicate_name_is_409() {
        let app = app().await;

        let resp = call(
            &app,
            "POST",
            "/api/v1/users",
            Some(json!({"name": "", "email": "nope", "password": "pw"})),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        create_alice(&app).await;
        let resp = call(
            &app,
            "POST",
            "/api/v1/users",
            Some(json!({"name": "alice", "email": "other@x.com", "password": "pw"})),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn update_changes_roles_only() {
        let app = app().await;
        let id = create_alice(&app).await;

        let resp = call(
            &app,
            "PUT",
            &format!("/api/v1/users/{id}"),
            Some(json!({
                "name": "eve",
                "email": "eve@x.com",
                "password": "new",
                "roles": [ROLE_ADMIN, ROLE_USER]
            })),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = json_body(resp).await;
        assert_eq!(body["data"]["id"], id);
        assert_eq!(body["data"]["name"], "alice");
        assert_eq!(body["data"]["email"], "a@x.com");
        assert_eq!(body["data"]["roles"], json!([ROLE_ADMIN, ROLE_USER]));
    }

    #[tokio::test]
    async fn update_accepts_stale_email_and_long_password_is_422() {
        let app = app().await;
        let id = create_alice(&app).await;

        let resp = call(
            &app,
            "PUT",
            &format!("/api/v1/users/{id}"),
            Some(json!({"email": "not-an-email", "roles": [ROLE_ADMIN]})),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = json_body(resp).await;
        assert_eq!(body["data"]["email"], "a@x.com");
        assert_eq!(body["data"]["roles"], json!([ROLE_ADMIN]));

        let resp = call(
            &app,
            "POST",
            "/api/v1/users",
            Some(json!({"name": "zoe", "email": "z@x.com", "password": "é".repeat(40)})),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn delete_is_idempotent_over_http() {
        let app = app().await;
        let id = create_alice(&app).await;

        for _ in 0..2 {
            let resp = call(&app, "DELETE", &format!("/api/v1/users/{id}"), None).await;
            assert_eq!(resp.status(), StatusCode::OK);
        }

        let resp = call(&app, "GET", &format!("/api/v1/users/{id}"), None).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn roles_and_health_endpoints() {
        let app = app().await;

        let resp = call(&app, "GET", "/api/v1/roles", None).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let labels: Vec<Value> = json_body(resp).await["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["label"].clone())
            .collect();
        assert_eq!(labels, vec![json!(ROLE_ADMIN), json!(ROLE_USER)]);

        let resp = call(&app, "GET", "/api/v1/health", None).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(json_body(resp).await["status"], "ok");
    }
}
