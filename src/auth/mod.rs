//! Account registration, login and session token handling.
//!
//! Flow overview:
//! - `register` validates input, checks email uniqueness with a full scan,
//!   hashes the password (Argon2id) and rewrites the whole user collection.
//! - `login` looks the user up by case-folded email and checks the hash. An
//!   unknown email and a wrong password produce the same error.
//! - Both return a signed HS256 token carrying the public profile; `verify`
//!   only checks signature and expiry, there is no server-side session.

pub mod clock;
pub mod jwt;
pub mod password;
pub mod utils;


pub use clock::{Clock, ManualClock, SystemClock};
pub use jwt::SessionClaims;

use crate::store::{self, Division, UnknownDivision, UserRecord, UserStore};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::{fmt, sync::Arc};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument};
use ulid::Ulid;
use utils::{non_blank, non_empty, normalize_email, strong_enough, valid_email};
use utoipa::ToSchema;

/// Shipped fallback secret. Anyone holding it can mint tokens.
pub const DEFAULT_JWT_SECRET: &str = "coachiq-insecure-development-secret-change-me";
pub const DEFAULT_TOKEN_TTL_SECONDS: i64 = 24 * 60 * 60;
pub const DEFAULT_OFFENSIVE_SYSTEM: &str = "Five-Out";
pub const DEFAULT_DEFENSIVE_SYSTEM: &str = "Pack Line";

#[derive(Debug, Error)]
pub enum Error {
    #[error("Missing required fields: fullName, email, password, teamName")]
    MissingRegistrationFields,
    #[error("Email and password are required")]
    MissingCredentials,
    #[error("Password must be at least 8 characters")]
    WeakPassword,
    #[error("Invalid email")]
    InvalidEmail,
    #[error("Invalid division")]
    InvalidDivision(#[source] UnknownDivision),
    #[error("Email already registered")]
    EmailTaken,
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Access token required")]
    MissingToken,
    #[error("Invalid or expired token")]
    InvalidToken(#[source] jwt::Error),
    #[error("User not found")]
    UserNotFound,
    #[error("user store failure")]
    Store(#[from] store::Error),
    #[error("password hashing failure: {0}")]
    Hash(String),
    #[error("token signing failure")]
    Signing(#[source] jwt::Error),
}

/// Coarse classification used to pick a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Conflict,
    Unauthenticated,
    InvalidToken,
    NotFound,
    Internal,
}

impl Error {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingRegistrationFields
            | Self::MissingCredentials
            | Self::WeakPassword
            | Self::InvalidEmail
            | Self::InvalidDivision(_) => ErrorKind::Validation,
            Self::EmailTaken => ErrorKind::Conflict,
            Self::InvalidCredentials | Self::MissingToken => ErrorKind::Unauthenticated,
            Self::InvalidToken(_) => ErrorKind::InvalidToken,
            Self::UserNotFound => ErrorKind::NotFound,
            Self::Store(_) | Self::Hash(_) | Self::Signing(_) => ErrorKind::Internal,
        }
    }
}

#[derive(Clone)]
pub struct AuthConfig {
    jwt_secret: SecretString,
    token_ttl_seconds: i64,
}

impl AuthConfig {
    #[must_use]
    pub fn new(jwt_secret: SecretString) -> Self {
        Self {
            jwt_secret,
            token_ttl_seconds: DEFAULT_TOKEN_TTL_SECONDS,
        }
    }

    #[must_use]
    pub fn with_token_ttl_seconds(mut self, seconds: i64) -> Self {
        self.token_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub const fn token_ttl_seconds(&self) -> i64 {
        self.token_ttl_seconds
    }

    #[must_use]
    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret.expose_secret() == DEFAULT_JWT_SECRET
    }

    fn secret(&self) -> &[u8] {
        self.jwt_secret.expose_secret().as_bytes()
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"***")
            .field("token_ttl_seconds", &self.token_ttl_seconds)
            .finish()
    }
}

/// Registration input. Every field is optional on the wire so missing values
/// can be reported with a single validation error.
#[derive(ToSchema, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub team_name: Option<String>,
    pub division: Option<String>,
    pub offensive_system: Option<String>,
    pub defensive_system: Option<String>,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("full_name", &self.full_name)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("team_name", &self.team_name)
            .field("division", &self.division)
            .field("offensive_system", &self.offensive_system)
            .field("defensive_system", &self.defensive_system)
            .finish()
    }
}

#[derive(ToSchema, Deserialize, Default, Clone)]
pub struct Credentials {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Account view safe to hand to clients.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub team_name: String,
    #[schema(value_type = String, example = "NCAA D1")]
    pub division: Division,
    pub offensive_system: String,
    pub defensive_system: String,
}

impl From<&UserRecord> for PublicUser {
    fn from(record: &UserRecord) -> Self {
        Self {
            id: record.id.clone(),
            email: record.email.clone(),
            full_name: record.full_name.clone(),
            team_name: record.team_name.clone(),
            division: record.division.clone(),
            offensive_system: record.offensive_system.clone(),
            defensive_system: record.defensive_system.clone(),
        }
    }
}

/// Result of a successful register or login.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: PublicUser,
}

#[derive(Debug)]
pub struct AuthService {
    store: Arc<dyn UserStore>,
    config: AuthConfig,
    clock: Arc<dyn Clock>,
    // serializes register's read-check-write against the store
    write_lock: Mutex<()>,
}

impl AuthService {
    #[must_use]
    pub fn new(store: Arc<dyn UserStore>, config: AuthConfig) -> Self {
        Self::with_clock(store, config, Arc::new(SystemClock))
    }

    #[must_use]
    pub fn with_clock(store: Arc<dyn UserStore>, config: AuthConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            config,
            clock,
            write_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Create an account and open a session for it.
    ///
    /// # Errors
    /// Validation errors for missing/weak/malformed input, [`Error::EmailTaken`]
    /// for a case-insensitive duplicate, internal errors for store or hashing
    /// failures.
    #[instrument(skip(self, registration))]
    pub async fn register(&self, registration: Registration) -> Result<Session, Error> {
        let Registration {
            full_name,
            email,
            password,
            team_name,
            division,
            offensive_system,
            defensive_system,
        } = registration;

        let (Some(full_name), Some(email), Some(password), Some(team_name)) = (
            non_blank(full_name),
            non_blank(email),
            non_empty(password),
            non_blank(team_name),
        ) else {
            return Err(Error::MissingRegistrationFields);
        };

        if !strong_enough(&password) {
            return Err(Error::WeakPassword);
        }

        let email = normalize_email(&email);
        if !valid_email(&email) {
            return Err(Error::InvalidEmail);
        }

        let division: Division = match non_blank(division) {
            Some(label) => label.parse().map_err(Error::InvalidDivision)?,
            None => Division::default(),
        };

        let _guard = self.write_lock.lock().await;

        let mut records = self.store.read_all().await?;
        if records.iter().any(|record| record.email == email) {
            debug!("email already registered");
            return Err(Error::EmailTaken);
        }

        let password_hash = hash_blocking(password).await?;

        let record = UserRecord {
            id: Ulid::new().to_string(),
            full_name,
            email,
            password_hash,
            team_name,
            division,
            offensive_system: non_blank(offensive_system)
                .unwrap_or_else(|| DEFAULT_OFFENSIVE_SYSTEM.to_string()),
            defensive_system: non_blank(defensive_system)
                .unwrap_or_else(|| DEFAULT_DEFENSIVE_SYSTEM.to_string()),
            created_at: self.clock.now(),
        };

        records.push(record.clone());
        self.store.write_all(&records).await?;

        info!(user_id = %record.id, "user registered");

        self.open_session(&record)
    }

    /// Check credentials and open a session.
    ///
    /// # Errors
    /// [`Error::MissingCredentials`] for absent fields and
    /// [`Error::InvalidCredentials`] for both unknown emails and wrong
    /// passwords.
    #[instrument(skip(self, credentials))]
    pub async fn login(&self, credentials: Credentials) -> Result<Session, Error> {
        let (Some(email), Some(password)) =
            (non_blank(credentials.email), non_empty(credentials.password))
        else {
            return Err(Error::MissingCredentials);
        };

        let email = normalize_email(&email);

        let Some(record) = self.store.find_by_email(&email).await? else {
            debug!("login for unknown email");
            return Err(Error::InvalidCredentials);
        };

        if !verify_blocking(password, record.password_hash.clone()).await? {
            debug!(user_id = %record.id, "password mismatch");
            return Err(Error::InvalidCredentials);
        }

        debug!(user_id = %record.id, "login successful");

        self.open_session(&record)
    }

    /// Decode and check a bearer token.
    ///
    /// # Errors
    /// [`Error::MissingToken`] when absent, [`Error::InvalidToken`] when
    /// malformed, badly signed or expired.
    pub fn verify_token(&self, token: Option<&str>) -> Result<SessionClaims, Error> {
        let token = token
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(Error::MissingToken)?;

        jwt::verify_hs256(token, self.config.secret(), self.clock.now_unix_seconds()).map_err(
            |err| {
                debug!("token rejected: {err}");
                Error::InvalidToken(err)
            },
        )
    }

    /// Load the public view of a stored user.
    ///
    /// # Errors
    /// [`Error::UserNotFound`] if no record carries `user_id`.
    #[instrument(skip(self))]
    pub async fn get_profile(&self, user_id: &str) -> Result<PublicUser, Error> {
        self.store
            .find_by_id(user_id)
            .await?
            .map(|record| PublicUser::from(&record))
            .ok_or(Error::UserNotFound)
    }

    fn open_session(&self, record: &UserRecord) -> Result<Session, Error> {
        let iat = self.clock.now_unix_seconds();
        let claims = SessionClaims {
            user_id: record.id.clone(),
            email: record.email.clone(),
            full_name: record.full_name.clone(),
            team_name: record.team_name.clone(),
            division: record.division.clone(),
            offensive_system: record.offensive_system.clone(),
            defensive_system: record.defensive_system.clone(),
            iat,
            exp: iat.saturating_add(self.config.token_ttl_seconds),
        };

        let token = jwt::sign_hs256(self.config.secret(), &claims).map_err(Error::Signing)?;

        Ok(Session {
            token,
            user: PublicUser::from(record),
        })
    }
}

// Argon2 runs on the blocking pool.
async fn hash_blocking(password: String) -> Result<String, Error> {
    tokio::task::spawn_blocking(move || password::hash_password(&password))
        .await
        .map_err(|e| Error::Hash(e.to_string()))?
        .map_err(Error::Hash)
}

async fn verify_blocking(password: String, hash: String) -> Result<bool, Error> {
    tokio::task::spawn_blocking(move || password::verify_password(&password, &hash))
        .await
        .map_err(|e| Error::Hash(e.to_string()))?
        .map_err(|e| {
            error!("stored password hash unreadable: {e}");
            Error::Hash(e)
        })
}
