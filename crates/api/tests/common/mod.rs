#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use stockroom_api::auth::jwt::{generate_access_token, JwtConfig};
use stockroom_api::auth::password::hash_password;
use stockroom_api::config::{JobsConfig, ServerConfig};
use stockroom_api::router::build_app_router;
use stockroom_api::state::AppState;
use stockroom_core::roles::{ROLE_ADMIN, ROLE_USER};
use stockroom_db::models::user::{CreateUser, User};
use stockroom_db::repositories::UserRepo;
use stockroom_storage::paths::{path_from_public_url, public_url};
use stockroom_storage::{BlobStore, StorageConfig, StorageError, UploadObject};
use tower::ServiceExt;

pub const TEST_PASSWORD: &str = "test_password_123";
const TEST_BUCKET: &str = "app-images";
const TEST_STORAGE_URL: &str = "https://storage.test";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret-long-enough".to_string(),
            access_token_expiry_mins: 15,
        },
        storage: StorageConfig {
            base_url: TEST_STORAGE_URL.to_string(),
            service_key: "service-key".to_string(),
            bucket: TEST_BUCKET.to_string(),
        },
        jobs: JobsConfig::default(),
    }
}

// ---------------------------------------------------------------------------
// In-memory blob store
// ---------------------------------------------------------------------------

/// Records uploads and removals instead of talking to Supabase.
#[derive(Default)]
pub struct FakeBlobStore {
    pub uploads: Mutex<Vec<(String, String)>>,
    pub removed: Mutex<Vec<String>>,
    pub reject_uploads: bool,
    pub reject_removals: bool,
}

impl FakeBlobStore {
    pub fn uploaded_paths(&self) -> Vec<String> {
        self.uploads
            .lock()
            .unwrap()
            .iter()
            .map(|(path, _)| path.clone())
            .collect()
    }

    pub fn removed_paths(&self) -> Vec<String> {
        self.removed.lock().unwrap().clone()
    }
}

#[async_trait]
impl BlobStore for FakeBlobStore {
    async fn upload(&self, object: UploadObject<'_>) -> Result<(), StorageError> {
        if self.reject_uploads {
            return Err(StorageError::Rejected {
                status: 413,
                message: "The object exceeded the maximum allowed size".into(),
            });
        }
        self.uploads
            .lock()
            .unwrap()
            .push((object.path.to_string(), object.content_type.to_string()));
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        public_url(TEST_STORAGE_URL, TEST_BUCKET, path)
    }

    fn path_from_url(&self, url: &str) -> Option<String> {
        path_from_public_url(url, TEST_BUCKET)
    }

    async fn remove(&self, paths: &[String]) -> Result<(), StorageError> {
        if self.reject_removals {
            return Err(StorageError::Rejected {
                status: 500,
                message: "storage unavailable".into(),
            });
        }
        self.removed.lock().unwrap().extend_from_slice(paths);
        Ok(())
    }

    async fn list(&self, _prefix: &str) -> Result<Vec<String>, StorageError> {
        Ok(self.uploaded_paths())
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build the full application router, using the production middleware
/// stack and an in-memory blob store.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_storage(pool, Arc::new(FakeBlobStore::default()))
}

pub fn build_test_app_with_storage(pool: PgPool, storage: Arc<FakeBlobStore>) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        storage,
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Users and tokens
// ---------------------------------------------------------------------------

/// Insert a user with [`TEST_PASSWORD`].
pub async fn create_user(pool: &PgPool, email: &str, role: &str) -> User {
    let password_hash = hash_password(TEST_PASSWORD).expect("hashing should succeed");
    UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            password_hash,
            role: role.to_string(),
            first_name: None,
            last_name: None,
        },
    )
    .await
    .expect("user creation should succeed")
}

pub fn token_for(user: &User) -> String {
    generate_access_token(user.id, &user.role, &test_config().jwt)
        .expect("token generation should succeed")
}

/// Create an admin and return a bearer token for it.
pub async fn admin_token(pool: &PgPool) -> String {
    let admin = create_user(pool, "admin@test.com", ROLE_ADMIN).await;
    token_for(&admin)
}

/// Create a regular user and return a bearer token for it.
pub async fn user_token(pool: &PgPool) -> String {
    let user = create_user(pool, "user@test.com", ROLE_USER).await;
    token_for(&user)
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

fn json_request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn empty_request(method: Method, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, empty_request(Method::GET, uri, None)).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, empty_request(Method::GET, uri, Some(token))).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, empty_request(Method::DELETE, uri, Some(token))).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, json_request(Method::POST, uri, None, body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, json_request(Method::POST, uri, Some(token), body)).await
}

pub async fn patch_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, json_request(Method::PATCH, uri, Some(token), body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, json_request(Method::PUT, uri, Some(token), body)).await
}

const MULTIPART_BOUNDARY: &str = "stockroom-test-boundary";

/// POST a multipart form with one file part named `field`.
pub async fn post_file_auth(
    app: Router,
    uri: &str,
    token: &str,
    field: &str,
    filename: &str,
    content_type: &str,
    bytes: &[u8],
) -> Response<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{MULTIPART_BOUNDARY}--\r\n").as_bytes());

    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .header(
            "content-type",
            format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}
