use tracing::{info, warn};

use crate::{
    accounts::{
        availability::{self, Availability},
        password::{hash_password, verify_password},
        repo::{NewUser, StoreError, User, UserStore},
    },
    error::AppError,
    validation::{self, email, password, phone, ValidationError},
};

/// Raw signup input as typed by the user.
#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub name: String,
    pub username: String,
    pub email: String,
    pub phone: Option<String>,
    pub password: String,
}

/// Availability of an already normalized username.
pub async fn username_availability(
    users: &dyn UserStore,
    username: &str,
) -> Result<Availability, StoreError> {
    availability::resolve(username, |name| async move {
        users.username_exists(&name).await
    })
    .await
}

/// Validate, normalize and persist a new account.
pub async fn register(users: &dyn UserStore, input: Registration) -> Result<User, AppError> {
    let full_name = validation::required(&input.name, "name")?.to_string();

    let username = validation::normalize_username(&input.username);
    validation::check_username(&username)?;

    let email = validation::normalize_email(&input.email);
    if email.is_empty() {
        return Err(ValidationError::MissingField("email").into());
    }
    if !email::is_valid(&email) {
        return Err(ValidationError::InvalidEmail.into());
    }

    let phone = phone::normalize(input.phone.as_deref())?;

    if !password::is_strong(&input.password) {
        return Err(ValidationError::WeakPassword.into());
    }

    if let Availability::Taken { suggestion } = username_availability(users, &username).await? {
        warn!(%username, "username already taken");
        return Err(AppError::Conflict {
            message: "Username already taken".into(),
            suggestion,
        });
    }
    if users.email_exists(&email).await? {
        warn!(%email, "email already registered");
        return Err(StoreError::Conflict("Email already registered".into()).into());
    }

    let password_hash = hash_password(&input.password).await?;
    let user = users
        .insert(NewUser {
            full_name,
            username,
            email,
            phone,
            password_hash,
        })
        .await?;

    info!(user_id = %user.id, username = %user.username, "user registered");
    Ok(user)
}

/// Look up by username or email and check the password.
///
/// `Ok(None)` covers both an unknown login and a wrong password.
pub async fn authenticate(
    users: &dyn UserStore,
    login: &str,
    password: &str,
) -> Result<Option<User>, AppError> {
    let login = login.trim().to_lowercase();
    if login.is_empty() || password.is_empty() {
        return Ok(None);
    }

    let Some(user) = users.find_by_login(&login).await? else {
        warn!(%login, "login unknown user");
        return Ok(None);
    };

    if !verify_password(password, &user.password_hash).await? {
        warn!(user_id = %user.id, "login invalid password");
        return Ok(None);
    }

    info!(user_id = %user.id, "user logged in");
    Ok(Some(user))
}
