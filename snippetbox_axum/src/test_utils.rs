//! Test doubles and an in-process client for driving the full router

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::{Router, body::Body, extract::Request};
use chrono::{TimeZone, Utc};
use http::{HeaderMap, Method, StatusCode, header};
use regex::Regex;
use tower::ServiceExt;

use snippetbox::{
    MemorySessionStore, ModelError, SessionConfig, SessionManager, Snippet, SnippetRepository,
    UserId, UserRepository,
};

use crate::router::app_router;
use crate::state::AppState;
use crate::templates::TemplateCache;

pub const VALID_NAME: &str = "Astarion Ancunin";
pub const VALID_EMAIL: &str = "lilstar@bg3.com";
pub const VALID_PASSWORD: &str = "cazadorsucks";
pub const DUPE_EMAIL: &str = "dupe@email.com";

pub fn mock_snippet() -> Snippet {
    Snippet {
        id: 1,
        title: "An old silent pond".to_string(),
        content: "An old silent pond...".to_string(),
        created: Utc.with_ymd_and_hms(2024, 6, 2, 3, 27, 0).unwrap(),
        expires: Utc.with_ymd_and_hms(2099, 6, 2, 3, 27, 0).unwrap(),
    }
}

/// Snippet repository holding the single [`mock_snippet`]; counts inserts
#[derive(Default)]
pub struct MockSnippetRepository {
    pub inserts: AtomicUsize,
}

impl MockSnippetRepository {
    pub fn insert_count(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SnippetRepository for MockSnippetRepository {
    async fn insert(&self, _title: &str, _content: &str, _days: u32) -> Result<i64, ModelError> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        Ok(2)
    }

    async fn get(&self, id: i64) -> Result<Snippet, ModelError> {
        match id {
            1 => Ok(mock_snippet()),
            _ => Err(ModelError::NoRecord),
        }
    }

    async fn latest(&self, _limit: usize) -> Result<Vec<Snippet>, ModelError> {
        Ok(vec![mock_snippet()])
    }
}

/// User repository with the single account id 1
pub struct MockUserRepository;

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn insert(&self, _name: &str, email: &str, _password: &str) -> Result<(), ModelError> {
        match email {
            DUPE_EMAIL => Err(ModelError::DuplicateEmail),
            _ => Ok(()),
        }
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<UserId, ModelError> {
        if email == VALID_EMAIL && password == VALID_PASSWORD {
            Ok(1)
        } else {
            Err(ModelError::InvalidCredentials)
        }
    }

    async fn exists(&self, id: UserId) -> Result<bool, ModelError> {
        Ok(id == 1)
    }
}

pub fn static_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../snippetbox-web/ui/static")
}

pub struct TestApp {
    pub state: AppState,
    pub snippets: Arc<MockSnippetRepository>,
    pub store: Arc<MemorySessionStore>,
}

impl TestApp {
    pub fn new() -> Self {
        let snippets = Arc::new(MockSnippetRepository::default());
        let store = Arc::new(MemorySessionStore::new());
        let state = AppState {
            snippets: snippets.clone(),
            users: Arc::new(MockUserRepository),
            templates: Arc::new(TemplateCache::new().unwrap()),
            sessions: SessionManager::new(store.clone(), SessionConfig::default()),
        };
        Self {
            state,
            snippets,
            store,
        }
    }

    pub fn router(&self) -> Router {
        app_router(self.state.clone(), static_dir())
    }

    pub fn client(&self) -> TestClient {
        TestClient::new(self.router())
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }
}

/// Sends requests through a router and replays cookies like a browser would
pub struct TestClient {
    app: Router,
    cookies: HashMap<String, String>,
}

impl TestClient {
    pub fn new(app: Router) -> Self {
        Self {
            app,
            cookies: HashMap::new(),
        }
    }

    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    pub fn set_cookie(&mut self, name: &str, value: &str) {
        self.cookies.insert(name.to_string(), value.to_string());
    }

    pub async fn get(&mut self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post_form(&mut self, uri: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields)
            .finish();
        self.send(Method::POST, uri, Some(body)).await
    }

    pub async fn send(&mut self, method: Method, uri: &str, form: Option<String>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if !self.cookies.is_empty() {
            let cookie = self
                .cookies
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join("; ");
            builder = builder.header(header::COOKIE, cookie);
        }
        let body = match form {
            Some(form) => {
                builder = builder.header(
                    header::CONTENT_TYPE,
                    "application/x-www-form-urlencoded",
                );
                Body::from(form)
            }
            None => Body::empty(),
        };

        let response = self
            .app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        for value in response.headers().get_all(header::SET_COOKIE) {
            let value = value.to_str().unwrap();
            let (name, rest) = value.split_once('=').unwrap();
            let cookie_value = rest.split(';').next().unwrap_or("");
            if value.contains("Max-Age=0") {
                self.cookies.remove(name);
            } else {
                self.cookies
                    .insert(name.to_string(), cookie_value.to_string());
            }
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        TestResponse {
            status,
            headers,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }

    /// Log in as the mock user and return a CSRF token valid for later posts.
    pub async fn login(&mut self) -> String {
        let page = self.get("/user/login").await;
        let token = extract_csrf_token(&page.body).unwrap();
        let response = self
            .post_form(
                "/user/login",
                &[
                    ("email", VALID_EMAIL),
                    ("password", VALID_PASSWORD),
                    ("csrf_token", token.as_str()),
                ],
            )
            .await;
        assert_eq!(response.status, StatusCode::SEE_OTHER);
        token
    }
}

pub fn extract_csrf_token(body: &str) -> Option<String> {
    let rx = Regex::new(r#"<input type="hidden" name="csrf_token" value="(.+)" />"#).unwrap();
    rx.captures(body).map(|c| c[1].to_string())
}
