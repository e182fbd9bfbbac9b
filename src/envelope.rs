use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Uniform response body shared by every route.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub error: bool,
    #[serde(rename = "statusCode")]
    pub status_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip)]
    status: StatusCode,
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(status: StatusCode, data: T) -> Self {
        Self {
            error: false,
            status_code: status.as_u16().to_string(),
            message: None,
            data: Some(data),
            status,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl Envelope<()> {
    pub fn message(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            error: false,
            status_code: status.as_u16().to_string(),
            message: Some(message.into()),
            data: None,
            status,
        }
    }

    pub fn failure(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            error: true,
            ..Self::message(status, message)
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn message_envelope_omits_data() {
        let env = Envelope::message(StatusCode::CREATED, "done");
        let v: Value = serde_json::to_value(&env).unwrap();
        assert_eq!(v, json!({"error": false, "statusCode": "201", "message": "done"}));
    }

    #[test]
    fn data_envelope_carries_payload() {
        let env = Envelope::ok(StatusCode::OK, json!({"accessToken": "t"})).with_message("hi");
        let v: Value = serde_json::to_value(&env).unwrap();
        assert_eq!(v["statusCode"], "200");
        assert_eq!(v["data"]["accessToken"], "t");
        assert_eq!(v["message"], "hi");
    }

    #[test]
    fn failure_sets_error_flag() {
        let env = Envelope::failure(StatusCode::UNAUTHORIZED, "Unauthorized");
        assert!(env.error);
        assert_eq!(env.into_response().status(), StatusCode::UNAUTHORIZED);
    }
}
