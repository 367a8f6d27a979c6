//! Common Test Utilities
//!
//! Backend services on ephemeral ports with in-memory storage, and a gateway
//! router wired to them.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum_test::TestServer;
use fake::faker::address::en::{CityName, StateAbbr, StreetName};
use fake::faker::name::en::Name;
use fake::Fake;
use serde_json::{json, Value};

use accounts_ledger::infrastructure::repositories::{InMemoryFinanceRepository, InMemoryUserRepository};
use accounts_ledger::config::CorsSettings;
use accounts_ledger::presentation::rpc::{
    CommandDispatcher, FinanceDispatcher, RpcClient, RpcServer, UserDispatcher,
};
use accounts_ledger::startup::{gateway_router, AppState};

pub const MAX_FRAME_SIZE: usize = 64 * 1024;
pub const MAX_RESPONSE_SIZE: usize = 16 * 1024 * 1024;
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Serve `dispatcher` on 127.0.0.1 until the test runtime ends.
pub async fn spawn_service(dispatcher: Arc<dyn CommandDispatcher>) -> SocketAddr {
    let server = RpcServer::bind("127.0.0.1:0", dispatcher, MAX_FRAME_SIZE)
        .await
        .expect("bind command channel");
    let addr = server.local_addr().expect("local addr");
    tokio::spawn(server.run(std::future::pending()));
    addr
}

pub async fn spawn_users_service() -> SocketAddr {
    spawn_service(Arc::new(UserDispatcher::new(Arc::new(InMemoryUserRepository::new())))).await
}

pub async fn spawn_finance_service() -> SocketAddr {
    spawn_service(Arc::new(FinanceDispatcher::new(Arc::new(InMemoryFinanceRepository::new())))).await
}

pub fn client(service: &'static str, addr: SocketAddr) -> RpcClient {
    RpcClient::new(service, addr.to_string(), REQUEST_TIMEOUT, MAX_RESPONSE_SIZE)
}

/// Gateway under test plus direct clients to its backends.
pub struct TestApp {
    pub server: TestServer,
    pub users: Arc<RpcClient>,
    pub finance: Arc<RpcClient>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let users = Arc::new(client("users", spawn_users_service().await));
        let finance = Arc::new(client("finance", spawn_finance_service().await));

        let state = AppState {
            users: users.clone(),
            finance: finance.clone(),
        };
        let cors = CorsSettings {
            allowed_origins: vec!["*".into()],
        };
        let server = TestServer::new(gateway_router(state, &cors)).expect("test server");

        Self {
            server,
            users,
            finance,
        }
    }

    /// Create a user through the gateway and return its id.
    pub async fn create_user(&self, email: &str) -> i64 {
        let response = self.server.post("/users").json(&user_body(email)).await;
        response.assert_status(axum::http::StatusCode::CREATED);
        response.json::<Value>()["data"]["id"]
            .as_i64()
            .expect("created user id")
    }

    /// Create a finance record through the gateway and return its id.
    pub async fn create_finance(&self, owner_id: i64, amount: f64, description: &str) -> i64 {
        let response = self
            .server
            .post("/finance")
            .json(&json!({
                "ownerId": owner_id,
                "amount": amount,
                "description": description,
            }))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);
        response.json::<Value>()["data"]["id"]
            .as_i64()
            .expect("created finance id")
    }
}

static EMAIL_SEQ: AtomicUsize = AtomicUsize::new(0);

/// Email no other test uses.
pub fn unique_email() -> String {
    format!("user{}@example.com", EMAIL_SEQ.fetch_add(1, Ordering::Relaxed))
}

/// Complete create-user payload.
pub fn user_body(email: &str) -> Value {
    let name: String = Name().fake();
    let street: String = StreetName().fake();
    let city: String = CityName().fake();
    let state: String = StateAbbr().fake();

    json!({
        "name": name,
        "email": email,
        "street": street,
        "number": "123",
        "neighborhood": "Centro",
        "city": city,
        "state": state,
        "cep": "01234-567",
    })
}
