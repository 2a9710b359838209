use axum::{
    extract::{Form, Path, State, rejection::FormRejection},
    response::{IntoResponse, Redirect, Response},
};
use http::StatusCode;

use snippetbox::{AuthError, ModelError, login, logout, take_redirect_after_login};

use crate::context::PageContext;
use crate::error::AppError;
use crate::forms::{SnippetCreateForm, UserLoginForm, UserSignupForm};
use crate::middleware::LOGIN_PATH;
use crate::state::AppState;
use crate::templates::{FormState, TemplateData};

const LATEST_LIMIT: usize = 10;

fn decoded<T>(form: Result<Form<T>, FormRejection>) -> Result<T, AppError> {
    form.map(|Form(inner)| inner).map_err(|e| {
        tracing::debug!("Undecodable form: {}", e);
        AppError::ClientError(StatusCode::BAD_REQUEST)
    })
}

pub async fn ping() -> &'static str {
    "OK"
}

pub async fn not_found() -> AppError {
    AppError::NotFound
}

pub async fn home(State(state): State<AppState>, ctx: PageContext) -> Result<Response, AppError> {
    let snippets = state.snippets.latest(LATEST_LIMIT).await?;
    let data = TemplateData {
        snippets,
        ..ctx.template_data()
    };
    state.templates.page("home.html", StatusCode::OK, &data)
}

pub async fn snippet_view(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ctx: PageContext,
) -> Result<Response, AppError> {
    let id = match id.parse::<i64>() {
        Ok(id) if id >= 1 => id,
        _ => return Err(AppError::NotFound),
    };
    let snippet = state.snippets.get(id).await?;

    let data = TemplateData {
        snippet: Some(snippet),
        ..ctx.template_data()
    };
    state.templates.page("view.html", StatusCode::OK, &data)
}

pub async fn snippet_create(
    State(state): State<AppState>,
    ctx: PageContext,
) -> Result<Response, AppError> {
    let form = FormState::default().with_value("expires", "365");
    state
        .templates
        .page("create.html", StatusCode::OK, &ctx.template_data_with_form(form))
}

pub async fn snippet_create_post(
    State(state): State<AppState>,
    ctx: PageContext,
    form: Result<Form<SnippetCreateForm>, FormRejection>,
) -> Result<Response, AppError> {
    let form = decoded(form)?;

    let validator = form.validate();
    let (true, Some(expires)) = (validator.valid(), form.expires_days()) else {
        let data = ctx.template_data_with_form(form.to_state(validator));
        return state
            .templates
            .page("create.html", StatusCode::UNPROCESSABLE_ENTITY, &data);
    };

    let id = state
        .snippets
        .insert(&form.title, &form.content, expires)
        .await?;
    ctx.set_flash("Snippet successfully created!")?;

    Ok(Redirect::to(&format!("/snippet/view/{id}")).into_response())
}

pub async fn user_signup(
    State(state): State<AppState>,
    ctx: PageContext,
) -> Result<Response, AppError> {
    state
        .templates
        .page("signup.html", StatusCode::OK, &ctx.template_data())
}

pub async fn user_signup_post(
    State(state): State<AppState>,
    ctx: PageContext,
    form: Result<Form<UserSignupForm>, FormRejection>,
) -> Result<Response, AppError> {
    let form = decoded(form)?;

    let mut validator = form.validate();
    if validator.valid() {
        match state
            .users
            .insert(&form.name, &form.email, &form.password)
            .await
        {
            Ok(()) => {
                ctx.set_flash("Your signup was successful. Please log in.")?;
                return Ok(Redirect::to(LOGIN_PATH).into_response());
            }
            Err(ModelError::DuplicateEmail) => {
                validator.add_field_error("email", "Email address is already in use");
            }
            Err(e) => return Err(e.into()),
        }
    }

    let data = ctx.template_data_with_form(form.to_state(validator));
    state
        .templates
        .page("signup.html", StatusCode::UNPROCESSABLE_ENTITY, &data)
}

pub async fn user_login(
    State(state): State<AppState>,
    ctx: PageContext,
) -> Result<Response, AppError> {
    state
        .templates
        .page("login.html", StatusCode::OK, &ctx.template_data())
}

pub async fn user_login_post(
    State(state): State<AppState>,
    ctx: PageContext,
    form: Result<Form<UserLoginForm>, FormRejection>,
) -> Result<Response, AppError> {
    let form = decoded(form)?;

    let mut validator = form.validate();
    if validator.valid() {
        match login(&ctx.session, state.users.as_ref(), &form.email, &form.password).await {
            Ok(_) => {
                let target = take_redirect_after_login(&ctx.session)
                    .unwrap_or_else(|| "/snippet/create".to_string());
                return Ok(Redirect::to(&target).into_response());
            }
            Err(AuthError::InvalidCredentials) => {
                validator.add_non_field_error("Email or password is incorrect");
            }
            Err(e) => return Err(e.into()),
        }
    }

    let data = ctx.template_data_with_form(form.to_state(validator));
    state
        .templates
        .page("login.html", StatusCode::UNPROCESSABLE_ENTITY, &data)
}

pub async fn user_logout_post(ctx: PageContext) -> Result<Response, AppError> {
    logout(&ctx.session);
    ctx.set_flash("You've been logged out successfully!")?;
    Ok(Redirect::to("/").into_response())
}
