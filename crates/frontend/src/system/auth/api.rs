use async_trait::async_trait;
use contracts::system::auth::{
    ChangePasswordRequest, LoginRequest, LoginResponse, RecoverPasswordRequest, VerifyCodeRequest,
    VerifyCodeResponse,
};
use gloo_net::http::Response;

use super::gate::{AuthApi, Credentials, LoginOutcome};
use crate::shared::api_utils::post_public;
use crate::shared::error::AppError;

/// REST implementation of the auth endpoints
#[derive(Debug, Default, Clone, Copy)]
pub struct HttpAuthApi;

#[async_trait(?Send)]
impl AuthApi for HttpAuthApi {
    async fn login(&self, request: &LoginRequest) -> Result<LoginOutcome, AppError> {
        let response = post_public("/auth/login", request).await?;
        login_status(response.status())?;
        let header_token = bearer_from_header(response.headers().get("Authorization"));
        let body: LoginResponse = read_body(response, "POST /auth/login").await?;
        interpret_login(body, header_token)
    }

    async fn verify_code(&self, request: &VerifyCodeRequest) -> Result<Credentials, AppError> {
        let response = post_public("/auth/verify-code", request).await?;
        code_status(response.status(), "POST /auth/verify-code")?;
        let header_token = bearer_from_header(response.headers().get("Authorization"));
        let body: VerifyCodeResponse = read_body(response, "POST /auth/verify-code").await?;
        interpret_verify(body, header_token)
    }

    async fn recover_password(&self, email: &str) -> Result<(), AppError> {
        let request = RecoverPasswordRequest {
            email: email.to_string(),
        };
        let response = post_public("/auth/recover-password", &request).await?;
        match response.status() {
            200..=299 => Ok(()),
            other => Err(AppError::fetch(
                "POST /auth/recover-password",
                format!("HTTP {}", other),
            )),
        }
    }

    async fn change_password(&self, request: &ChangePasswordRequest) -> Result<(), AppError> {
        let response = post_public("/auth/change-password", request).await?;
        code_status(response.status(), "POST /auth/change-password")
    }
}

async fn read_body<T: serde::de::DeserializeOwned>(
    response: Response,
    context: &str,
) -> Result<T, AppError> {
    response
        .json::<T>()
        .await
        .map_err(|e| AppError::MappingError(format!("{}: {}", context, e)))
}

fn login_status(status: u16) -> Result<(), AppError> {
    match status {
        200..=299 => Ok(()),
        400 | 401 | 403 | 404 => Err(AppError::InvalidCredentials),
        other => Err(AppError::fetch("POST /auth/login", format!("HTTP {}", other))),
    }
}

/// Status of the endpoints that consume a one-time code
fn code_status(status: u16, context: &str) -> Result<(), AppError> {
    match status {
        200..=299 => Ok(()),
        400 | 401 | 403 | 404 | 410 => Err(AppError::InvalidOrExpiredCode),
        other => Err(AppError::fetch(context, format!("HTTP {}", other))),
    }
}

fn bearer_from_header(value: Option<String>) -> Option<String> {
    let value = value?;
    let token = value.strip_prefix("Bearer ").unwrap_or(&value).trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

fn interpret_login(body: LoginResponse, header_token: Option<String>) -> Result<LoginOutcome, AppError> {
    if body.requires_second_factor {
        return Ok(LoginOutcome::SecondFactor);
    }
    match (body.token.or(header_token), body.user) {
        (Some(token), Some(user)) => Ok(LoginOutcome::Authenticated(Credentials { token, user })),
        _ => Err(AppError::MappingError(
            "login response has neither a second factor nor credentials".to_string(),
        )),
    }
}

fn interpret_verify(body: VerifyCodeResponse, header_token: Option<String>) -> Result<Credentials, AppError> {
    let token = body
        .token
        .or(header_token)
        .ok_or_else(|| AppError::MappingError("verify-code response without token".to_string()))?;
    Ok(Credentials {
        token,
        user: body.user,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(login_status(401), Err(AppError::InvalidCredentials));
        assert_eq!(login_status(200), Ok(()));
        assert!(matches!(login_status(502), Err(AppError::FetchFailed(_))));
        assert_eq!(code_status(400, "x"), Err(AppError::InvalidOrExpiredCode));
        assert_eq!(code_status(410, "x"), Err(AppError::InvalidOrExpiredCode));
    }

    #[test]
    fn test_bearer_header() {
        assert_eq!(bearer_from_header(Some("Bearer abc".into())), Some("abc".into()));
        assert_eq!(bearer_from_header(Some("abc".into())), Some("abc".into()));
        assert_eq!(bearer_from_header(Some("Bearer ".into())), None);
        assert_eq!(bearer_from_header(None), None);
    }

    #[test]
    fn test_verify_token_falls_back_to_header() {
        let body: VerifyCodeResponse =
            serde_json::from_str(r#"{"user":{"id":1,"email":"a@b.c","role":"ADMIN"}}"#).unwrap();
        let credentials = interpret_verify(body, Some("from-header".into())).unwrap();
        assert_eq!(credentials.token, "from-header");

        let body: VerifyCodeResponse =
            serde_json::from_str(r#"{"user":{"id":1,"email":"a@b.c","role":1}}"#).unwrap();
        assert!(matches!(interpret_verify(body, None), Err(AppError::MappingError(_))));
    }

    #[test]
    fn test_login_without_credentials_is_a_mapping_error() {
        let body: LoginResponse = serde_json::from_str("{}").unwrap();
        assert!(matches!(interpret_login(body, None), Err(AppError::MappingError(_))));

        let body: LoginResponse = serde_json::from_str(r#"{"requiresSecondFactor":true}"#).unwrap();
        assert_eq!(interpret_login(body, None), Ok(LoginOutcome::SecondFactor));
    }
}
