//! Login, registration and logout pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::header::SET_COOKIE,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::application::services::IssuedSession;
use crate::error::AppError;
use crate::state::AppState;
use crate::web::cookies::{SESSION_COOKIE, clear_cookie, read_cookie, set_cookie};
use crate::web::extractors::{MaybeUser, safe_next};
use crate::web::flash::{Flash, IncomingFlashes};
use crate::web::page::{PageContext, PageError};

pub const DASHBOARD_PATH: &str = "/cv/dashboard";
pub const OAUTH_DISABLED: &str = "Please use email/password to sign in.";

#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
struct LoginTemplate {
    ctx: PageContext,
    email: String,
    next: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
struct RegisterTemplate {
    ctx: PageContext,
    name: String,
    email: String,
    errors: RegisterErrors,
}

#[derive(Debug, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    /// Checkbox: present (any value) when ticked.
    pub remember: Option<String>,
    pub next: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterForm {
    #[serde(default)]
    #[validate(
        custom(function = "not_blank", code = "required", message = "Name is required"),
        length(min = 2, max = 100, message = "Name must be 2-100 characters")
    )]
    pub name: String,
    #[serde(default)]
    #[validate(
        custom(function = "not_blank", code = "required", message = "Email is required"),
        email(message = "Invalid email address")
    )]
    pub email: String,
    #[serde(default)]
    #[validate(
        custom(function = "not_blank", code = "required", message = "Password is required"),
        length(min = 8, message = "Password must be at least 8 characters")
    )]
    pub password: String,
    #[serde(default)]
    #[validate(
        custom(function = "not_blank", code = "required", message = "Please confirm your password"),
        must_match(other = "password", message = "Passwords must match")
    )]
    pub confirm_password: String,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("required"))
    } else {
        Ok(())
    }
}

/// First error per field, in form order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RegisterErrors {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
}

impl RegisterErrors {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// A missing value outranks any other rule on the same field.
    fn from_validation(errors: &ValidationErrors) -> Self {
        let fields = errors.field_errors();
        let first = |field: &str| {
            let field_errors = fields.get(field)?;
            field_errors
                .iter()
                .find(|e| e.code == "required")
                .or_else(|| field_errors.first())
                .and_then(|e| e.message.as_ref())
                .map(|m| m.to_string())
        };

        Self {
            name: first("name"),
            email: first("email"),
            password: first("password"),
            confirm_password: first("confirm_password"),
        }
    }
}

impl RegisterForm {
    /// Trims name and email; the password is taken as typed.
    pub fn trimmed(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            ..self
        }
    }

    pub fn errors(&self) -> RegisterErrors {
        match self.validate() {
            Ok(()) => RegisterErrors::default(),
            Err(errors) => RegisterErrors::from_validation(&errors),
        }
    }
}

fn login_url(next: Option<&str>) -> String {
    match safe_next(next) {
        Some(next) => format!(
            "/auth/login?{}",
            url::form_urlencoded::Serializer::new(String::new())
                .append_pair("next", next)
                .finish()
        ),
        None => "/auth/login".to_string(),
    }
}

/// Session cookie plus flash plus redirect.
fn signed_in(
    state: &AppState,
    session: IssuedSession,
    flash: Flash,
    target: &str,
) -> Response {
    let cookie = set_cookie(
        SESSION_COOKIE,
        &session.token,
        Some(session.max_age.num_seconds()),
        state.secure_cookies,
    );
    (AppendHeaders([(SET_COOKIE, cookie)]), flash, Redirect::to(target)).into_response()
}

/// # Endpoint
///
/// `GET /auth/login?next=/cv/...`
pub async fn login_page(
    MaybeUser(user): MaybeUser,
    flashes: IncomingFlashes,
    Query(query): Query<NextQuery>,
) -> Response {
    if user.is_some() {
        return Redirect::to(DASHBOARD_PATH).into_response();
    }

    let template = LoginTemplate {
        ctx: PageContext::new(None, flashes),
        email: String::new(),
        next: safe_next(query.next.as_deref()).unwrap_or("").to_string(),
    };
    template.into_response()
}

/// # Endpoint
///
/// `POST /auth/login` (form: `email`, `password`, `remember`, `next`)
///
/// Failures flash a message and redirect back to the login page.
pub async fn login_submit(
    State(state): State<AppState>,
    MaybeUser(current): MaybeUser,
    Form(form): Form<LoginForm>,
) -> Result<Response, PageError> {
    if current.is_some() {
        return Ok(Redirect::to(DASHBOARD_PATH).into_response());
    }

    let back = login_url(form.next.as_deref());

    if form.email.trim().is_empty() || form.password.is_empty() {
        return Ok((
            Flash::new().error("Email and password are required"),
            Redirect::to(&back),
        )
            .into_response());
    }

    let user = match state.auth_service.login(&form.email, &form.password).await {
        Ok(user) => user,
        Err(e @ (AppError::Unauthorized { .. } | AppError::Forbidden { .. })) => {
            return Ok((Flash::new().error(e.message()), Redirect::to(&back)).into_response());
        }
        Err(e) => return Err(e.into()),
    };

    let session = state
        .auth_service
        .start_session(user.id, form.remember.is_some())
        .await?;

    let target = safe_next(form.next.as_deref()).unwrap_or(DASHBOARD_PATH);
    let flash = Flash::new().success(format!("Welcome back, {}!", user.label()));

    Ok(signed_in(&state, session, flash, target))
}

/// # Endpoint
///
/// `GET /auth/register`
pub async fn register_page(MaybeUser(user): MaybeUser, flashes: IncomingFlashes) -> Response {
    if user.is_some() {
        return Redirect::to(DASHBOARD_PATH).into_response();
    }

    let template = RegisterTemplate {
        ctx: PageContext::new(None, flashes),
        name: String::new(),
        email: String::new(),
        errors: RegisterErrors::default(),
    };
    template.into_response()
}

/// # Endpoint
///
/// `POST /auth/register` (form: `name`, `email`, `password`, `confirm_password`)
///
/// Invalid input re-renders the form with per-field errors. A taken email
/// flashes and re-renders. Success logs the new user in.
pub async fn register_submit(
    State(state): State<AppState>,
    MaybeUser(current): MaybeUser,
    Form(form): Form<RegisterForm>,
) -> Result<Response, PageError> {
    if current.is_some() {
        return Ok(Redirect::to(DASHBOARD_PATH).into_response());
    }

    let form = form.trimmed();
    let rerender = |ctx: PageContext, errors: RegisterErrors| {
        let template = RegisterTemplate {
            ctx,
            name: form.name.clone(),
            email: form.email.clone(),
            errors,
        };
        template.into_response()
    };

    let errors = form.errors();
    if !errors.is_empty() {
        return Ok(rerender(PageContext::default(), errors));
    }

    let user = match state
        .auth_service
        .register(&form.name, &form.email, &form.password)
        .await
    {
        Ok(user) => user,
        Err(e @ AppError::Conflict { .. }) => {
            let ctx = PageContext {
                user_name: None,
                flashes: vec![crate::web::flash::FlashMessage {
                    category: "error".to_string(),
                    message: e.message().to_string(),
                }],
            };
            return Ok(rerender(ctx, RegisterErrors::default()));
        }
        Err(e) => return Err(e.into()),
    };

    let session = state.auth_service.start_session(user.id, false).await?;
    let flash = Flash::new().success(format!("Welcome to CV Builder, {}!", user.label()));

    Ok(signed_in(&state, session, flash, DASHBOARD_PATH))
}

/// # Endpoint
///
/// `GET /auth/logout`
pub async fn logout(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    headers: axum::http::HeaderMap,
) -> Response {
    if let Some(token) = read_cookie(&headers, SESSION_COOKIE)
        && let Err(e) = state.auth_service.logout(&token).await
    {
        tracing::warn!(error = %e, "Failed to delete session on logout");
    }

    let flash = match &user {
        Some(user) => Flash::new().info(format!(
            "Goodbye, {}! You have been logged out successfully.",
            user.label()
        )),
        None => Flash::new(),
    };

    (
        AppendHeaders([(SET_COOKIE, clear_cookie(SESSION_COOKIE, state.secure_cookies))]),
        flash,
        Redirect::to("/"),
    )
        .into_response()
}

/// # Endpoints
///
/// `GET /auth/google`, `GET /auth/callback`
///
/// Google sign-in is not offered; both routes send users to the password login.
pub async fn google_disabled() -> Response {
    (Flash::new().info(OAUTH_DISABLED), Redirect::to("/auth/login")).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str, email: &str, password: &str, confirm: &str) -> RegisterForm {
        RegisterForm {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    #[test]
    fn test_register_validation_messages() {
        let errors = form("", "", "", "").errors();
        assert_eq!(errors.name.as_deref(), Some("Name is required"));
        assert_eq!(errors.email.as_deref(), Some("Email is required"));
        assert_eq!(errors.password.as_deref(), Some("Password is required"));
        assert_eq!(
            errors.confirm_password.as_deref(),
            Some("Please confirm your password")
        );

        let errors = form("A", "not-an-email", "short", "other").errors();
        assert_eq!(errors.name.as_deref(), Some("Name must be 2-100 characters"));
        assert_eq!(errors.email.as_deref(), Some("Invalid email address"));
        assert_eq!(
            errors.password.as_deref(),
            Some("Password must be at least 8 characters")
        );
        assert_eq!(errors.confirm_password.as_deref(), Some("Passwords must match"));

        assert!(form("Ada", "ada@example.com", "password123", "password123")
            .errors()
            .is_empty());
    }

    #[test]
    fn test_register_form_is_trimmed_before_validation() {
        let errors = form("   ", "  ada@example.com ", "password123", "password123")
            .trimmed()
            .errors();
        assert_eq!(errors.name.as_deref(), Some("Name is required"));
        assert!(errors.email.is_none());

        let long_name = "x".repeat(101);
        let errors = form(&long_name, "ada@example.com", "password123", "password123").errors();
        assert_eq!(errors.name.as_deref(), Some("Name must be 2-100 characters"));

        let form = form(" Ada ", " ada@example.com ", "password123", "password123").trimmed();
        assert_eq!(form.name, "Ada");
        assert_eq!(form.email, "ada@example.com");
        assert!(form.errors().is_empty());
    }

    #[test]
    fn test_login_url_keeps_local_next_only() {
        assert_eq!(login_url(None), "/auth/login");
        assert_eq!(login_url(Some("//evil.example")), "/auth/login");
        assert_eq!(
            login_url(Some("/cv/abc/edit")),
            "/auth/login?next=%2Fcv%2Fabc%2Fedit"
        );
    }
}
