//! Page templates and the cache that serves them by name.
//!
//! Pages are compiled into the binary by askama; the cache maps each page name
//! to its renderer and executes every page once when it is built, so a template
//! that cannot render stops startup instead of failing a request.

use std::collections::HashMap;

use askama::Template;
use axum::response::{Html, IntoResponse, Response};
use chrono::{Datelike, Utc};
use http::StatusCode;
use thiserror::Error;

use snippetbox::Snippet;

use crate::error::AppError;

/// Submitted form values and the errors found in them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    pub values: HashMap<String, String>,
    pub field_errors: HashMap<String, String>,
    pub non_field_errors: Vec<String>,
}

impl FormState {
    pub fn with_value(mut self, name: &str, value: impl Into<String>) -> Self {
        self.values.insert(name.to_string(), value.into());
        self
    }

    /// Submitted value of `name`, or an empty string.
    pub fn value(&self, name: &str) -> &str {
        self.values.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn field_error(&self, name: &str) -> Option<&str> {
        self.field_errors.get(name).map(String::as_str)
    }
}

/// Everything a page may display
#[derive(Debug, Clone, Default)]
pub struct TemplateData {
    pub current_year: i32,
    pub snippet: Option<Snippet>,
    pub snippets: Vec<Snippet>,
    pub form: FormState,
    pub flash: Option<String>,
    pub is_authenticated: bool,
    pub csrf_token: String,
}

impl TemplateData {
    pub fn new() -> Self {
        Self {
            current_year: Utc::now().year(),
            ..Default::default()
        }
    }
}

#[derive(Template)]
#[template(path = "pages/home.html")]
struct HomePage<'a> {
    data: &'a TemplateData,
}

#[derive(Template)]
#[template(path = "pages/view.html")]
struct ViewPage<'a> {
    data: &'a TemplateData,
}

#[derive(Template)]
#[template(path = "pages/create.html")]
struct CreatePage<'a> {
    data: &'a TemplateData,
}

#[derive(Template)]
#[template(path = "pages/signup.html")]
struct SignupPage<'a> {
    data: &'a TemplateData,
}

#[derive(Template)]
#[template(path = "pages/login.html")]
struct LoginPage<'a> {
    data: &'a TemplateData,
}

fn render_home(data: &TemplateData) -> askama::Result<String> {
    HomePage { data }.render()
}

fn render_view(data: &TemplateData) -> askama::Result<String> {
    ViewPage { data }.render()
}

fn render_create(data: &TemplateData) -> askama::Result<String> {
    CreatePage { data }.render()
}

fn render_signup(data: &TemplateData) -> askama::Result<String> {
    SignupPage { data }.render()
}

fn render_login(data: &TemplateData) -> askama::Result<String> {
    LoginPage { data }.render()
}

pub type PageRenderer = fn(&TemplateData) -> askama::Result<String>;

/// Every page the application serves, keyed by template file name
pub const PAGES: &[(&str, PageRenderer)] = &[
    ("home.html", render_home),
    ("view.html", render_view),
    ("create.html", render_create),
    ("signup.html", render_signup),
    ("login.html", render_login),
];

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template {0} registered twice")]
    Duplicate(String),

    #[error("Template {0} does not exist")]
    NotFound(String),

    #[error("Failed to render template {name}: {source}")]
    Render {
        name: String,
        #[source]
        source: askama::Error,
    },
}

/// Immutable name to page mapping, built once at startup
#[derive(Debug)]
pub struct TemplateCache {
    pages: HashMap<&'static str, PageRenderer>,
}

impl TemplateCache {
    /// Build the cache of all application pages.
    pub fn new() -> Result<Self, TemplateError> {
        Self::build(PAGES)
    }

    pub fn build(pages: &[(&'static str, PageRenderer)]) -> Result<Self, TemplateError> {
        let mut cache = HashMap::new();
        for (name, renderer) in pages {
            if cache.insert(*name, *renderer).is_some() {
                return Err(TemplateError::Duplicate(name.to_string()));
            }
        }
        let cache = Self { pages: cache };

        let probe = TemplateData::default();
        for name in cache.pages.keys() {
            cache.render(name, &probe)?;
        }
        tracing::info!("Template cache built with {} pages", cache.pages.len());
        Ok(cache)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.pages.contains_key(name)
    }

    /// Render a page into a complete document.
    pub fn render(&self, name: &str, data: &TemplateData) -> Result<String, TemplateError> {
        let renderer = self
            .pages
            .get(name)
            .ok_or_else(|| TemplateError::NotFound(name.to_string()))?;
        renderer(data).map_err(|source| TemplateError::Render {
            name: name.to_string(),
            source,
        })
    }

    /// Render a page and wrap it in a response with `status`. Nothing is sent
    /// unless the whole page rendered.
    pub fn page(
        &self,
        name: &str,
        status: StatusCode,
        data: &TemplateData,
    ) -> Result<Response, AppError> {
        let body = self.render(name, data)?;
        Ok((status, Html(body)).into_response())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_snippet() -> Snippet {
        Snippet {
            id: 1,
            title: "An old silent pond".to_string(),
            content: "An old silent pond...".to_string(),
            created: Utc.with_ymd_and_hms(2024, 6, 2, 3, 27, 0).unwrap(),
            expires: Utc.with_ymd_and_hms(2025, 6, 2, 3, 27, 0).unwrap(),
        }
    }

    fn failing_renderer(_: &TemplateData) -> askama::Result<String> {
        Err(askama::Error::Fmt)
    }

    #[test]
    fn test_cache_builds_all_pages() {
        let cache = TemplateCache::new().unwrap();
        for (name, _) in PAGES {
            assert!(cache.contains(name), "{name} missing");
        }
    }

    #[test]
    fn test_duplicate_page_is_rejected() {
        let pages: &[(&'static str, PageRenderer)] =
            &[("home.html", render_home), ("home.html", render_view)];
        assert!(matches!(
            TemplateCache::build(pages),
            Err(TemplateError::Duplicate(name)) if name == "home.html"
        ));
    }

    #[test]
    fn test_broken_page_fails_build() {
        let pages: &[(&'static str, PageRenderer)] =
            &[("home.html", render_home), ("broken.html", failing_renderer)];
        assert!(matches!(
            TemplateCache::build(pages),
            Err(TemplateError::Render { name, .. }) if name == "broken.html"
        ));
    }

    #[test]
    fn test_unknown_page_is_an_error() {
        let cache = TemplateCache::new().unwrap();
        assert!(matches!(
            cache.render("missing.html", &TemplateData::new()),
            Err(TemplateError::NotFound(_))
        ));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let cache = TemplateCache::new().unwrap();
        let data = TemplateData {
            snippets: vec![sample_snippet()],
            csrf_token: "token".to_string(),
            ..TemplateData::new()
        };

        let first = cache.render("home.html", &data).unwrap();
        let second = cache.render("home.html", &data).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_view_page_shows_snippet() {
        let cache = TemplateCache::new().unwrap();
        let data = TemplateData {
            snippet: Some(sample_snippet()),
            ..TemplateData::new()
        };

        let html = cache.render("view.html", &data).unwrap();

        assert!(html.contains("An old silent pond..."));
        assert!(html.contains("02 Jun 2024 at 03:27"));
    }

    #[test]
    fn test_content_is_escaped() {
        let cache = TemplateCache::new().unwrap();
        let mut snippet = sample_snippet();
        snippet.content = "<script>alert(1)</script>".to_string();
        let data = TemplateData {
            snippet: Some(snippet),
            ..TemplateData::new()
        };

        let html = cache.render("view.html", &data).unwrap();

        assert!(!html.contains("<script>alert(1)</script>"));
    }

    #[test]
    fn test_form_pages_embed_csrf_token() {
        let cache = TemplateCache::new().unwrap();
        let data = TemplateData {
            csrf_token: "abc123".to_string(),
            ..TemplateData::new()
        };

        for page in ["create.html", "signup.html", "login.html"] {
            let html = cache.render(page, &data).unwrap();
            assert!(
                html.contains(r#"<input type="hidden" name="csrf_token" value="abc123" />"#),
                "{page} lacks csrf field"
            );
        }
    }

    #[test]
    fn test_form_state_accessors() {
        let mut form = FormState::default().with_value("title", "Hi");
        form.field_errors
            .insert("content".to_string(), "This field cannot be blank".to_string());

        assert_eq!(form.value("title"), "Hi");
        assert_eq!(form.value("missing"), "");
        assert_eq!(form.field_error("content"), Some("This field cannot be blank"));
        assert_eq!(form.field_error("title"), None);
    }
}
