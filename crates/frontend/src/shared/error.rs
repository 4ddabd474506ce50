//! Error taxonomy of the frontend
//!
//! Every REST helper, the auth gate and the realtime channel return
//! `Result<_, AppError>`. `user_message()` is what the UI shows.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("invalid or expired code")]
    InvalidOrExpiredCode,

    #[error("recovery email could not be delivered")]
    DeliveryFailed,

    #[error("session expired or token rejected")]
    Unauthorized,

    #[error("request failed: {0}")]
    FetchFailed(String),

    #[error("unexpected value from server: {0}")]
    MappingError(String),

    #[error("realtime channel is not active")]
    NotActive,
}

impl AppError {
    /// Текст для пользователя (UI на испанском)
    pub fn user_message(&self) -> String {
        match self {
            AppError::InvalidCredentials => "Usuario o contraseña incorrectos".to_string(),
            AppError::InvalidOrExpiredCode => "Código inválido o expirado".to_string(),
            // Same text whether or not the account exists
            AppError::DeliveryFailed => "No se pudo enviar el correo de recuperación".to_string(),
            AppError::Unauthorized => "Tu sesión ha expirado, inicia sesión nuevamente".to_string(),
            AppError::FetchFailed(_) => "No se pudo completar la operación".to_string(),
            AppError::MappingError(_) => "Respuesta inesperada del servidor".to_string(),
            AppError::NotActive => "Sin conexión en tiempo real".to_string(),
        }
    }

    pub fn fetch(context: &str, cause: impl std::fmt::Display) -> Self {
        AppError::FetchFailed(format!("{}: {}", context, cause))
    }
}

impl From<gloo_net::Error> for AppError {
    fn from(e: gloo_net::Error) -> Self {
        AppError::FetchFailed(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delivery_failure_does_not_leak_account_existence() {
        let message = AppError::DeliveryFailed.user_message();
        assert!(!message.to_lowercase().contains("no existe"));
        assert!(!message.to_lowercase().contains("not found"));
    }

    #[test]
    fn test_fetch_helper_keeps_context() {
        let err = AppError::fetch("GET /jobs/me", "timeout");
        assert_eq!(err, AppError::FetchFailed("GET /jobs/me: timeout".into()));
        assert_eq!(err.user_message(), "No se pudo completar la operación");
    }
}
