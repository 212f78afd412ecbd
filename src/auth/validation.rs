//! Schema checks applied to request bodies before any handler runs.
//!
//! A handler that takes [`Validated<T>`] only ever sees a payload that
//! passed `T`'s schema; everything else is answered with a 400 `fail`
//! envelope carrying the first violation found.

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use tracing::warn;

use super::dto::{
    AccountChanges, Credentials, LoginRequest, NewAccount, RegisterRequest, UpdateUserRequest,
};
use crate::error::AppError;

const USERNAME_MIN: usize = 3;
const USERNAME_MAX: usize = 20;
const PASSWORD_MIN: usize = 8;

lazy_static! {
    static ref USERNAME_RE: Regex = Regex::new(r"^[A-Za-z0-9._]+$").unwrap();
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}

/// A validated payload type and the raw body it is parsed from.
pub trait Schema: Sized {
    type Raw: DeserializeOwned + Send;

    fn check(raw: Self::Raw) -> Result<Self, String>;
}

/// Extractor that deserializes the JSON body and applies `T`'s schema.
pub struct Validated<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for Validated<T>
where
    S: Send + Sync,
    T: Schema + Send,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(raw) = Json::<T::Raw>::from_request(req, state)
            .await
            .map_err(|rejection| {
                warn!(error = %rejection.body_text(), "unreadable payload");
                AppError::Validation(rejection.body_text())
            })?;
        T::check(raw).map(Validated).map_err(|msg| {
            warn!(%msg, "payload rejected");
            AppError::Validation(msg)
        })
    }
}

/// `deserialize_with` helper: keeps an explicit `null` apart from an omitted
/// field (`Some(None)` vs `None`, the latter via `#[serde(default)]`).
pub fn present<'de, D, T>(d: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(d).map(Some)
}

pub fn required(field: &str, value: Option<String>) -> Result<String, String> {
    let value = value.ok_or_else(|| format!("{} is required", field))?;
    not_empty(field, &value)?;
    Ok(value)
}

pub fn not_empty(field: &str, value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Err(format!("{} must not be empty", field));
    }
    Ok(())
}

pub fn check_username(value: &str) -> Result<(), String> {
    not_empty("username", value)?;
    let len = value.chars().count();
    if len < USERNAME_MIN {
        return Err(format!("username must be at least {} characters", USERNAME_MIN));
    }
    if len > USERNAME_MAX {
        return Err(format!("username must be at most {} characters", USERNAME_MAX));
    }
    if !USERNAME_RE.is_match(value) {
        return Err("username may only contain letters, digits, dots and underscores".into());
    }
    Ok(())
}

pub fn check_email(value: &str) -> Result<(), String> {
    not_empty("email", value)?;
    if !EMAIL_RE.is_match(value) {
        return Err("email must be a valid email".into());
    }
    Ok(())
}

/// Mailboxes are compared case-insensitively, so emails are stored folded.
pub fn normalize_email(value: &str) -> String {
    value.trim().to_lowercase()
}

pub fn check_password(value: &str) -> Result<(), String> {
    not_empty("password", value)?;
    if value.chars().count() < PASSWORD_MIN {
        return Err(format!("password must be at least {} characters", PASSWORD_MIN));
    }
    Ok(())
}

pub fn check_full_name(value: &str) -> Result<(), String> {
    not_empty("full_name", value)
}

impl Schema for NewAccount {
    type Raw = RegisterRequest;

    fn check(raw: RegisterRequest) -> Result<Self, String> {
        let username = required("username", raw.username)?;
        check_username(&username)?;
        let email = normalize_email(&required("email", raw.email)?);
        check_email(&email)?;
        let password = required("password", raw.password)?;
        check_password(&password)?;
        let full_name = required("full_name", raw.full_name)?;
        check_full_name(&full_name)?;
        Ok(Self {
            username,
            password,
            email,
            full_name,
        })
    }
}

impl Schema for Credentials {
    type Raw = LoginRequest;

    fn check(raw: LoginRequest) -> Result<Self, String> {
        Ok(Self {
            username: required("username", raw.username)?,
            password: required("password", raw.password)?,
        })
    }
}

/// Checks a field of a partial update: omitted passes, `null` fails.
pub fn optional<T>(
    field: &str,
    value: Option<Option<T>>,
    rule: impl Fn(&T) -> Result<(), String>,
) -> Result<Option<T>, String> {
    match value {
        None => Ok(None),
        Some(None) => Err(format!("{} must not be null", field)),
        Some(Some(v)) => rule(&v).map(|_| Some(v)),
    }
}

impl Schema for AccountChanges {
    type Raw = UpdateUserRequest;

    fn check(raw: UpdateUserRequest) -> Result<Self, String> {
        Ok(Self {
            username: optional("username", raw.username, |v| check_username(v))?,
            email: optional(
                "email",
                raw.email.map(|v| v.map(|e| normalize_email(&e))),
                |v| check_email(v),
            )?,
            password: optional("password", raw.password, |v| check_password(v))?,
            full_name: optional("full_name", raw.full_name, |v| check_full_name(v))?,
        })
    }
}
