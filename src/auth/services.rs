use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{error, info, warn};

use super::{
    dto::{LoginRequest, RegisterRequest},
    jwt::JwtKeys,
    password::{hash_password_blocking, verify_password_blocking},
    repo_types::{NewUser, User},
};
use crate::{
    error::{AppError, AppResult},
    storage::UserStore,
};

const PASSWORD_PATTERN: &str = "^[a-zA-Z0-9]{3,30}$";

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(
        r"^[a-z0-9!#$%&'*+/=?^_`{|}~-]+(\.[a-z0-9!#$%&'*+/=?^_`{|}~-]+)*@([a-z0-9]([a-z0-9-]*[a-z0-9])?\.)+(com|net)$"
    )
    .unwrap();
    static ref PASSWORD_RE: Regex = Regex::new(PASSWORD_PATTERN).unwrap();
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(&email.to_ascii_lowercase())
}

fn required<'a>(field: &str, value: &'a Option<String>) -> AppResult<&'a str> {
    match value.as_deref() {
        None => Err(AppError::Validation(format!("\"{field}\" is required"))),
        Some("") => Err(AppError::Validation(format!(
            "\"{field}\" is not allowed to be empty"
        ))),
        Some(v) => Ok(v),
    }
}

fn check_email(value: &Option<String>) -> AppResult<String> {
    let email = required("email", value)?.trim().to_lowercase();
    if !is_valid_email(&email) {
        return Err(AppError::Validation("\"email\" must be a valid email".into()));
    }
    Ok(email)
}

fn check_password(value: &Option<String>) -> AppResult<String> {
    let password = required("password", value)?;
    if !PASSWORD_RE.is_match(password) {
        return Err(AppError::Validation(format!(
            "\"password\" fails to match the required pattern: /{PASSWORD_PATTERN}/"
        )));
    }
    Ok(password.to_string())
}

/// Registration input after validation, in field order name, email, password.
#[derive(Debug)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

pub fn validate_register(req: &RegisterRequest) -> AppResult<Registration> {
    let name = required("name", &req.name)?.to_string();
    let email = check_email(&req.email)?;
    let password = check_password(&req.password)?;
    Ok(Registration { name, email, password })
}

pub fn validate_login(req: &LoginRequest) -> AppResult<(String, String)> {
    let email = check_email(&req.email)?;
    let password = check_password(&req.password)?;
    Ok((email, password))
}

/// Registration and login over an explicit user store and signing keys.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    keys: JwtKeys,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, keys: JwtKeys) -> Self {
        Self { users, keys }
    }

    pub async fn register(&self, req: RegisterRequest) -> AppResult<User> {
        let reg = validate_register(&req).map_err(|e| {
            warn!(error = %e, "invalid registration");
            e
        })?;

        if self.users.find_by_email(&reg.email).await?.is_some() {
            warn!(email = %reg.email, "email already registered");
            return Err(AppError::Conflict);
        }

        let password_hash = hash_password_blocking(reg.password).await.map_err(|e| {
            error!(error = %e, "hash_password failed");
            AppError::Internal(e.to_string())
        })?;

        let user = self
            .users
            .create(NewUser {
                email: reg.email,
                name: reg.name,
                password_hash,
            })
            .await?;

        info!(user_id = %user.id, email = %user.email, "user registered");
        Ok(user)
    }

    /// Returns a signed session token.
    pub async fn login(&self, req: LoginRequest) -> AppResult<String> {
        let (email, password) = validate_login(&req)?;

        let Some(user) = self.users.find_by_email(&email).await? else {
            warn!(email = %email, "login unknown email");
            return Err(AppError::Authentication);
        };

        let ok = verify_password_blocking(password, user.password_hash.clone())
            .await
            .map_err(|e| {
                error!(error = %e, user_id = %user.id, "verify_password failed");
                AppError::Internal(e.to_string())
            })?;
        if !ok {
            warn!(email = %email, user_id = %user.id, "login invalid password");
            return Err(AppError::Authentication);
        }

        let token = self.keys.sign(&user).map_err(|e| {
            error!(error = %e, "jwt sign failed");
            AppError::Internal(e.to_string())
        })?;
        info!(user_id = %user.id, email = %user.email, "user logged in");
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::JwtConfig, storage::MemoryStore};

    fn service() -> AuthService {
        let keys = JwtKeys::new(&JwtConfig {
            secret: "test-secret".into(),
            ttl_minutes: 60,
        });
        AuthService::new(Arc::new(MemoryStore::new()), keys)
    }

    fn register_req(email: &str, name: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            email: Some(email.into()),
            name: Some(name.into()),
            password: Some(password.into()),
        }
    }

    fn login_req(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: Some(email.into()),
            password: Some(password.into()),
        }
    }

    fn validation_message(err: AppError) -> String {
        match err {
            AppError::Validation(msg) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn email_shape() {
        assert!(is_valid_email("a@x.com"));
        assert!(is_valid_email("first.last@mail.example.net"));
        assert!(is_valid_email("A@X.COM"));
        assert!(!is_valid_email("a@x.org"));
        assert!(!is_valid_email("a@com"));
        assert!(!is_valid_email("no-at-sign.com"));
        assert!(!is_valid_email("a b@x.com"));
    }

    #[test]
    fn register_reports_first_violation_in_field_order() {
        let err = validate_register(&RegisterRequest::default()).unwrap_err();
        assert_eq!(validation_message(err), "\"name\" is required");

        let err = validate_register(&register_req("bad", "", "abc123")).unwrap_err();
        assert_eq!(validation_message(err), "\"name\" is not allowed to be empty");

        let err = validate_register(&register_req("bad", "Al", "!")).unwrap_err();
        assert_eq!(validation_message(err), "\"email\" must be a valid email");

        let err = validate_register(&register_req("a@x.com", "Al", "ab")).unwrap_err();
        assert_eq!(
            validation_message(err),
            "\"password\" fails to match the required pattern: /^[a-zA-Z0-9]{3,30}$/"
        );
    }

    #[test]
    fn password_pattern_bounds() {
        assert!(check_password(&Some("abc".into())).is_ok());
        assert!(check_password(&Some("a".repeat(30))).is_ok());
        assert!(check_password(&Some("a".repeat(31))).is_err());
        assert!(check_password(&Some("abc-123".into())).is_err());
    }

    #[test]
    fn email_is_normalized() {
        let reg = validate_register(&register_req("  A@X.com ", "Al", "abc123")).unwrap();
        assert_eq!(reg.email, "a@x.com");
    }

    #[tokio::test]
    async fn register_twice_conflicts_and_keeps_first_user() {
        let svc = service();
        let first = svc.register(register_req("a@x.com", "First", "abc123")).await.unwrap();

        let err = svc
            .register(register_req("a@x.com", "Second", "xyz789"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict));

        let stored = svc.users.find_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(stored.id, first.id);
        assert_eq!(stored.name, "First");
    }

    #[tokio::test]
    async fn register_then_login_issues_token() {
        let svc = service();
        let user = svc.register(register_req("a@x.com", "Alice", "abc123")).await.unwrap();
        assert_ne!(user.password_hash, "abc123");

        let token = svc.login(login_req("a@x.com", "abc123")).await.unwrap();
        let claims = svc.keys.verify(&token).unwrap();
        assert_eq!(claims.id, user.id);
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.user_active_name, "Alice");
    }

    #[tokio::test]
    async fn login_with_wrong_password_is_rejected() {
        let svc = service();
        svc.register(register_req("a@x.com", "Alice", "abc123")).await.unwrap();

        let err = svc.login(login_req("a@x.com", "wrong1")).await.unwrap_err();
        assert!(matches!(err, AppError::Authentication));
    }

    #[tokio::test]
    async fn login_with_unknown_email_is_rejected() {
        let err = service()
            .login(login_req("ghost@x.com", "abc123"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Authentication));
    }

    #[tokio::test]
    async fn login_validates_before_lookup() {
        let err = service().login(LoginRequest::default()).await.unwrap_err();
        assert_eq!(validation_message(err), "\"email\" is required");
    }
}
