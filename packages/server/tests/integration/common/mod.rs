use std::net::SocketAddr;
use std::sync::Arc;

use reqwest::Client;
use sea_orm::DatabaseConnection;
use serde_json::Value;
use tempfile::TempDir;

use ::common::storage::filesystem::FilesystemBlobStore;
use grievance_server::config::{
    AppConfig, AuthConfig, CorsConfig, DatabaseConfig, GrievanceConfig, SeedConfig, ServerConfig,
    StorageConfig,
};
use grievance_server::grievance::{GrievanceStore, NewGrievance};
use grievance_server::officer::{NewOfficer, OfficerDirectory};
use grievance_server::state::AppState;
use grievance_server::store::StorePolicy;

pub const PASSWORD: &str = "correct-horse";

pub mod routes {
    pub const LOGIN: &str = "/api/v1/auth/login";
    pub const ME: &str = "/api/v1/auth/me";
    pub const GRIEVANCES: &str = "/api/v1/grievances";
    pub const DASHBOARD_STATS: &str = "/api/v1/dashboard/stats";
    pub const MY_PROFILE: &str = "/api/v1/officers/me";

    pub fn grievance(id: i32) -> String {
        format!("/api/v1/grievances/{id}")
    }

    pub fn claim(id: i32) -> String {
        format!("/api/v1/grievances/{id}/claim")
    }

    pub fn resolve(id: i32) -> String {
        format!("/api/v1/grievances/{id}/resolve")
    }
}

/// A running test server backed by a throwaway SQLite database.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub db: DatabaseConnection,
    pub policy: StorePolicy,
    _dir: TempDir,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// An officer provisioned and logged in for a test.
pub struct Officer {
    pub id: i32,
    pub mobile: String,
    pub token: String,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_url = format!("sqlite://{}?mode=rwc", dir.path().join("test.db").display());

        let db = grievance_server::database::init_db(&db_url)
            .await
            .expect("Failed to initialize test database");
        grievance_server::seed::ensure_indexes(&db)
            .await
            .expect("Failed to create indexes");

        let storage = StorageConfig {
            photo_dir: dir.path().join("photos"),
            max_photo_size: 64 * 1024,
        };

        let app_config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors: CorsConfig {
                    allow_origins: vec![],
                    max_age: 3600,
                },
            },
            database: DatabaseConfig::new(db_url.clone()),
            auth: AuthConfig {
                jwt_secret: "test-secret-for-integration-tests".to_string(),
                token_ttl_hours: 1,
            },
            storage: storage.clone(),
            grievance: GrievanceConfig::default(),
            seed: SeedConfig::default(),
        };

        let photos = FilesystemBlobStore::new(storage.photo_dir, storage.max_photo_size)
            .await
            .expect("Failed to open photo store");

        let policy = StorePolicy::from_config(&app_config);
        let state = AppState {
            db: db.clone(),
            config: Arc::new(app_config),
            policy,
            photos: Arc::new(photos),
        };

        let app = grievance_server::build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: Client::new(),
            db,
            policy,
            _dir: dir,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn officers(&self) -> OfficerDirectory<'_, DatabaseConnection> {
        OfficerDirectory::new(&self.db, &self.policy)
    }

    pub fn grievances(&self) -> GrievanceStore<'_, DatabaseConnection> {
        GrievanceStore::new(&self.db, &self.policy)
    }

    pub async fn post_without_token(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn get_with_token(&self, path: &str, token: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn get_without_token(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn patch_with_token(&self, path: &str, body: &Value, token: &str) -> TestResponse {
        let res = self
            .client
            .patch(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .json(body)
            .send()
            .await
            .expect("Failed to send PATCH request");

        TestResponse::from_response(res).await
    }

    pub async fn patch_without_token(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .patch(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send PATCH request");

        TestResponse::from_response(res).await
    }

    pub async fn patch_form_with_token(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
        token: &str,
    ) -> TestResponse {
        let res = self
            .client
            .patch(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .multipart(form)
            .send()
            .await
            .expect("Failed to send multipart PATCH request");

        TestResponse::from_response(res).await
    }

    /// Provision an officer directly in the directory and return its id.
    pub async fn provision_officer(&self, name: &str, mobile: &str) -> i32 {
        self.officers()
            .provision(NewOfficer {
                name: name.to_string(),
                mobile: mobile.to_string(),
                password: PASSWORD.to_string(),
                email: format!("{}@example.edu", name.to_lowercase().replace(' ', ".")),
                designation: "Warden".to_string(),
                department: "Hostel Administration".to_string(),
            })
            .await
            .expect("Failed to provision officer")
            .id
    }

    pub async fn login(&self, mobile: &str, password: &str) -> TestResponse {
        self.post_without_token(
            routes::LOGIN,
            &serde_json::json!({"mobile": mobile, "password": password}),
        )
        .await
    }

    /// Provision an officer and log in, returning its id and token.
    pub async fn officer(&self, name: &str, mobile: &str) -> Officer {
        let id = self.provision_officer(name, mobile).await;

        let res = self.login(mobile, PASSWORD).await;
        assert_eq!(res.status, 200, "Login failed: {}", res.text);

        Officer {
            id,
            mobile: mobile.to_string(),
            token: res.body["token"]
                .as_str()
                .expect("Login response should contain a token")
                .to_string(),
        }
    }

    /// Submit a pending grievance through the store and return its id.
    pub async fn submit_grievance(&self, subject: &str) -> i32 {
        self.grievances()
            .submit(
                NewGrievance {
                    student_ref: "2023CS101".to_string(),
                    subject: subject.to_string(),
                    description: format!("{subject}, please look into it."),
                    attachment: None,
                },
                chrono::Duration::days(7),
            )
            .await
            .expect("Failed to submit grievance")
            .id
    }

    /// Claim a grievance over HTTP, asserting success.
    pub async fn claim(&self, id: i32, token: &str) -> TestResponse {
        let res = self
            .patch_with_token(&routes::claim(id), &serde_json::json!({}), token)
            .await;
        assert_eq!(res.status, 200, "claim failed: {}", res.text);
        res
    }

    pub async fn resolve(
        &self,
        id: i32,
        remarks: &str,
        status: &str,
        token: &str,
    ) -> TestResponse {
        self.patch_with_token(
            &routes::resolve(id),
            &serde_json::json!({"remarks": remarks, "status": status}),
            token,
        )
        .await
    }
}

impl TestResponse {
    pub async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let content_type = res
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = res.bytes().await.map(|b| b.to_vec()).unwrap_or_default();
        let text = String::from_utf8_lossy(&bytes).into_owned();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self {
            status,
            text,
            body,
            content_type,
            bytes,
        }
    }

    pub fn id(&self) -> i32 {
        self.body["id"]
            .as_i64()
            .expect("response body should contain 'id'") as i32
    }
}
