use serde::{Deserialize, Serialize};

/// Request body for user registration. Fields are optional so that a missing
/// one is reported as a validation message rather than a body rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
}

/// Request body for login.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginData {
    #[serde(rename = "accessToken")]
    pub access_token: String,
}
