use std::sync::Arc;

use snippetbox::{SessionManager, SnippetRepository, UserRepository};

use crate::templates::TemplateCache;

/// Dependencies shared by every handler and interceptor, built once at startup
#[derive(Clone)]
pub struct AppState {
    pub snippets: Arc<dyn SnippetRepository>,
    pub users: Arc<dyn UserRepository>,
    pub templates: Arc<TemplateCache>,
    pub sessions: SessionManager,
}
