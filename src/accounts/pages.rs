use axum::{
    extract::{FromRef, State},
    http::{header::SET_COOKIE, StatusCode},
    response::{AppendHeaders, Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;
use tracing::{error, instrument, warn};

use crate::{
    accounts::{
        services::{self, Registration},
        session::{SessionKeys, SessionUser},
        views::{self, SignupValues},
    },
    error::AppError,
    state::AppState,
    validation::{password, ValidationError},
};

pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/signup", get(signup_form).post(signup))
        .route("/login", get(login_form).post(login))
        .route("/dashboard", get(dashboard))
        .route("/logout", post(logout))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SignupForm {
    pub name: String,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub confirm: String,
}

impl SignupForm {
    fn values(&self) -> SignupValues<'_> {
        SignupValues {
            name: &self.name,
            username: &self.username,
            email: &self.email,
            phone: &self.phone,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub login: String,
    pub password: String,
}

fn page(status: StatusCode, html: String) -> Response {
    (status, Html(html)).into_response()
}

/// Log the user in and send them to the dashboard.
fn start_session(state: &AppState, user_id: uuid::Uuid) -> Response {
    match SessionKeys::from_ref(state).cookie_for(user_id) {
        Ok(cookie) => (
            AppendHeaders([(SET_COOKIE, cookie)]),
            Redirect::to("/dashboard"),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "session cookie failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn index(session: Option<SessionUser>) -> Redirect {
    match session {
        Some(_) => Redirect::to("/dashboard"),
        None => Redirect::to("/login"),
    }
}

pub async fn signup_form() -> Html<String> {
    Html(views::signup_page(&SignupValues::default(), None))
}

#[instrument(skip(state, form), fields(username = %form.username))]
pub async fn signup(State(state): State<AppState>, Form(form): Form<SignupForm>) -> Response {
    if form.password != form.confirm {
        let msg = ValidationError::PasswordMismatch.to_string();
        return page(
            StatusCode::BAD_REQUEST,
            views::signup_page(&form.values(), Some(&msg)),
        );
    }

    let registration = Registration {
        name: form.name.clone(),
        username: form.username.clone(),
        email: form.email.clone(),
        phone: Some(form.phone.clone()),
        password: form.password.clone(),
    };

    match services::register(state.users.as_ref(), registration).await {
        Ok(user) => start_session(&state, user.id),
        Err(err) => {
            let status = err.status();
            let msg = match &err {
                AppError::Validation(ValidationError::WeakPassword) => {
                    let label =
                        password::StrengthLabel::for_score(password::strength_score(&form.password));
                    format!("{err} (current strength: {})", label.as_str())
                }
                AppError::Conflict {
                    message,
                    suggestion: Some(suggestion),
                } => format!("{message}. Try \"{suggestion}\"."),
                AppError::Store(_) | AppError::Internal(_) => {
                    error!(error = %err, "signup failed");
                    "Something went wrong, please try again".to_string()
                }
                other => other.to_string(),
            };
            page(status, views::signup_page(&form.values(), Some(&msg)))
        }
    }
}

pub async fn login_form() -> Html<String> {
    Html(views::login_page("", None))
}

#[instrument(skip(state, form), fields(login = %form.login))]
pub async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Response {
    match services::authenticate(state.users.as_ref(), &form.login, &form.password).await {
        Ok(Some(user)) => start_session(&state, user.id),
        Ok(None) => page(
            StatusCode::UNAUTHORIZED,
            views::login_page(&form.login, Some("Invalid credentials")),
        ),
        Err(e) => {
            error!(error = %e, "login failed");
            page(
                StatusCode::INTERNAL_SERVER_ERROR,
                views::login_page(&form.login, Some("Something went wrong, please try again")),
            )
        }
    }
}

#[instrument(skip_all)]
pub async fn dashboard(State(state): State<AppState>, session: Option<SessionUser>) -> Response {
    let Some(SessionUser(user_id)) = session else {
        return Redirect::to("/login").into_response();
    };

    match state.users.find_by_id(user_id).await {
        Ok(Some(user)) => Html(views::dashboard_page(&user)).into_response(),
        Ok(None) => {
            warn!(%user_id, "session for missing user");
            logout(State(state)).await
        }
        Err(e) => {
            error!(error = %e, %user_id, "dashboard lookup failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn logout(State(state): State<AppState>) -> Response {
    let keys = SessionKeys::from_ref(&state);
    (
        AppendHeaders([(SET_COOKIE, keys.clear_cookie())]),
        Redirect::to("/login"),
    )
        .into_response()
}
