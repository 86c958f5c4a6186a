use std::sync::Arc;

use auth::Authenticator;
use auth::HashingParams;
use auth::JwtHandler;
use identity_service::domain::user::service::AuthService;
use identity_service::inbound::http::router::create_router;
use identity_service::outbound::repositories::InMemoryUserRepository;
use serde_json::json;

pub const JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Test application that spawns a real server over an in-memory user store
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub jwt_handler: JwtHandler,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        // Cheapest work factor argon2 accepts; production values are validated by Config
        let hashing = HashingParams {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        };
        let authenticator = Arc::new(
            Authenticator::new(JWT_SECRET, chrono::Duration::hours(24), hashing)
                .expect("Failed to create authenticator"),
        );

        let user_repo = Arc::new(InMemoryUserRepository::new());
        let auth_service = Arc::new(
            AuthService::new(user_repo, authenticator).expect("Failed to create auth service"),
        );

        let router = create_router(auth_service);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        let jwt_handler = JwtHandler::new(JWT_SECRET, chrono::Duration::hours(24))
            .expect("Failed to create JWT handler");

        Self {
            address,
            api_client: reqwest::Client::new(),
            jwt_handler,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    pub async fn signup(&self, username: &str, password: &str) -> reqwest::Response {
        self.post("/signup")
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn login(&self, username: &str, password: &str) -> reqwest::Response {
        self.post("/login")
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Sign up and log in, returning the issued token
    pub async fn token_for(&self, username: &str, password: &str) -> String {
        self.signup(username, password).await;

        let body: serde_json::Value = self
            .login(username, password)
            .await
            .json()
            .await
            .expect("Failed to parse response");

        body["data"]["token"]
            .as_str()
            .expect("Missing token in login response")
            .to_string()
    }
}
