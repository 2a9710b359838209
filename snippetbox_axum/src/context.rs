use axum::extract::FromRequestParts;
use http::request::Parts;

use snippetbox::{CsrfToken, Principal, Session};

use crate::error::AppError;
use crate::templates::{FormState, TemplateData};

/// Session key of the one-shot message shown on the next page
pub const FLASH_KEY: &str = "flash";

/// Request-scoped values contributed by the dynamic pipeline
#[derive(Debug, Clone)]
pub struct PageContext {
    pub session: Session,
    pub principal: Principal,
    pub csrf_token: CsrfToken,
}

impl PageContext {
    /// Data common to every page. Consumes any pending flash message.
    pub fn template_data(&self) -> TemplateData {
        TemplateData {
            flash: self.session.pop::<String>(FLASH_KEY),
            is_authenticated: self.principal.is_authenticated(),
            csrf_token: self.csrf_token.as_str().to_string(),
            ..TemplateData::new()
        }
    }

    pub fn template_data_with_form(&self, form: FormState) -> TemplateData {
        TemplateData {
            form,
            ..self.template_data()
        }
    }

    pub fn set_flash(&self, message: &str) -> Result<(), AppError> {
        self.session.insert(FLASH_KEY, message)?;
        Ok(())
    }
}

impl<S> FromRequestParts<S> for PageContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::server("Session missing from request"))?;
        let csrf_token = parts
            .extensions
            .get::<CsrfToken>()
            .cloned()
            .ok_or_else(|| AppError::server("CSRF token missing from request"))?;
        let principal = parts
            .extensions
            .get::<Principal>()
            .copied()
            .unwrap_or_default();

        Ok(Self {
            session,
            principal,
            csrf_token,
        })
    }
}
