use serde::{Deserialize, Serialize};

use crate::enums::user_role::UserRole;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Result of the credential step.
///
/// When `requires_second_factor` is set the server has sent a one-time code
/// and `token`/`user` are absent; otherwise both must be present.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(default)]
    pub requires_second_factor: bool,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<UserInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyCodeRequest {
    pub email: String,
    pub code: String,
}

/// Token may instead arrive in the `Authorization` response header
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyCodeResponse {
    #[serde(default)]
    pub token: Option<String>,
    pub user: UserInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoverPasswordRequest {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub email: String,
    pub code: String,
    pub new_password: String,
}

/// Authenticated identity, used for per-user topic addressing and routing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub firstname: Option<String>,
    #[serde(default)]
    pub lastname: Option<String>,
    pub role: UserRole,
}

impl UserInfo {
    pub fn display_name(&self) -> String {
        match (&self.firstname, &self.lastname) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(first), None) => first.clone(),
            _ => self.email.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_response_second_factor() {
        let response: LoginResponse =
            serde_json::from_str(r#"{"requiresSecondFactor": true}"#).unwrap();
        assert!(response.requires_second_factor);
        assert!(response.token.is_none());
        assert!(response.user.is_none());
    }

    #[test]
    fn test_login_response_direct_token() {
        let response: LoginResponse = serde_json::from_str(
            r#"{"token":"jwt","user":{"id":3,"email":"e@taller.com","role":2}}"#,
        )
        .unwrap();
        assert!(!response.requires_second_factor);
        assert_eq!(response.user.unwrap().role, UserRole::Employee);
    }

    #[test]
    fn test_change_password_body_is_camel_case() {
        let body = serde_json::to_value(ChangePasswordRequest {
            email: "a@b.c".into(),
            code: "1234".into(),
            new_password: "secret".into(),
        })
        .unwrap();
        assert_eq!(body["newPassword"], "secret");
    }
}
