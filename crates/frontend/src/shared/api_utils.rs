//! API utilities for frontend-backend communication
//!
//! URL construction for REST and realtime endpoints, plus the authorized
//! request helpers used by every domain `api.rs`.

use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::config::load_config;
use super::error::AppError;
use crate::system::auth::gate::AuthGate;

/// Get the base URL for API requests
///
/// Built from the current window location and the configured backend port
/// and base path, e.g. "http://localhost:8090/api/v1".
/// Empty string if window is not available.
pub fn api_base() -> String {
    let config = load_config();
    let window = match web_sys::window() {
        Some(w) => w,
        None => return String::new(),
    };
    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let hostname = location
        .hostname()
        .unwrap_or_else(|_| "127.0.0.1".to_string());
    join_base(&protocol, &hostname, config.api.port, &config.api.base_path)
}

/// Build a full API URL from a path relative to the base path
///
/// # Example
/// ```rust,ignore
/// let url = api_url("/jobs/me");
/// ```
pub fn api_url(path: &str) -> String {
    format!("{}{}", api_base(), path)
}

/// WebSocket URL of the STOMP endpoint (`ws://` or `wss://`)
pub fn realtime_url() -> String {
    let config = load_config();
    let window = match web_sys::window() {
        Some(w) => w,
        None => return String::new(),
    };
    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let hostname = location
        .hostname()
        .unwrap_or_else(|_| "127.0.0.1".to_string());
    let ws_protocol = if protocol == "https:" { "wss:" } else { "ws:" };
    join_base(ws_protocol, &hostname, config.api.port, &config.realtime.endpoint)
}

fn join_base(protocol: &str, hostname: &str, port: u16, path: &str) -> String {
    format!("{}//{}:{}{}", protocol, hostname, port, path)
}

/// Map a non-success status to the error taxonomy
pub fn check_status(status: u16, context: &str) -> Result<(), AppError> {
    match status {
        200..=299 => Ok(()),
        401 => Err(AppError::Unauthorized),
        other => Err(AppError::fetch(context, format!("HTTP {}", other))),
    }
}

async fn parse_json<T: DeserializeOwned>(response: Response, context: &str) -> Result<T, AppError> {
    response
        .json::<T>()
        .await
        .map_err(|e| AppError::MappingError(format!("{}: {}", context, e)))
}

fn to_body<B: Serialize>(body: &B, context: &str) -> Result<serde_json::Value, AppError> {
    serde_json::to_value(body).map_err(|e| AppError::fetch(context, e))
}

/// Authorized REST client bound to the session of an [`AuthGate`].
///
/// Every request carries the current bearer token. A 401 ends the session
/// that issued the request; concurrent 401s of the same session tear it down
/// only once.
#[derive(Clone)]
pub struct ApiClient {
    gate: AuthGate,
}

impl ApiClient {
    pub fn new(gate: AuthGate) -> Self {
        Self { gate }
    }

    async fn send(
        &self,
        builder: RequestBuilder,
        body: Option<serde_json::Value>,
        context: &str,
    ) -> Result<Response, AppError> {
        let token = self.gate.token().ok_or(AppError::Unauthorized)?;
        let builder = builder.header("Authorization", &format!("Bearer {}", token));
        let request: Request = match body {
            Some(body) => builder.json(&body).map_err(|e| AppError::fetch(context, e))?,
            None => builder.build().map_err(|e| AppError::fetch(context, e))?,
        };

        let response = request
            .send()
            .await
            .map_err(|e| AppError::fetch(context, e))?;

        self.settle(response.status(), &token, context)?;
        Ok(response)
    }

    /// Status check of a response to a request sent with `token`. A 401
    /// ends that session, once.
    fn settle(&self, status: u16, token: &str, context: &str) -> Result<(), AppError> {
        if let Err(e) = check_status(status, context) {
            if e == AppError::Unauthorized && self.gate.handle_unauthorized(token) {
                log::warn!("[api] {} returned 401, session ended", context);
            }
            return Err(e);
        }
        Ok(())
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, AppError> {
        let context = format!("GET {}", path);
        let response = self.send(Request::get(&api_url(path)), None, &context).await?;
        parse_json(response, &context).await
    }

    pub async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, AppError> {
        let context = format!("POST {}", path);
        let body = to_body(body, &context)?;
        let response = self
            .send(Request::post(&api_url(path)), Some(body), &context)
            .await?;
        parse_json(response, &context).await
    }

    pub async fn put_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, AppError> {
        let context = format!("PUT {}", path);
        let body = to_body(body, &context)?;
        let response = self
            .send(Request::put(&api_url(path)), Some(body), &context)
            .await?;
        parse_json(response, &context).await
    }

    /// POST whose response body is not needed
    pub async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<(), AppError> {
        let context = format!("POST {}", path);
        let body = to_body(body, &context)?;
        self.send(Request::post(&api_url(path)), Some(body), &context)
            .await?;
        Ok(())
    }

    pub async fn put<B: Serialize>(&self, path: &str, body: &B) -> Result<(), AppError> {
        let context = format!("PUT {}", path);
        let body = to_body(body, &context)?;
        self.send(Request::put(&api_url(path)), Some(body), &context)
            .await?;
        Ok(())
    }

    /// PUT without a body, response ignored
    pub async fn put_empty(&self, path: &str) -> Result<(), AppError> {
        let context = format!("PUT {}", path);
        self.send(Request::put(&api_url(path)), None, &context).await?;
        Ok(())
    }

    pub async fn delete(&self, path: &str) -> Result<(), AppError> {
        let context = format!("DELETE {}", path);
        self.send(Request::delete(&api_url(path)), None, &context).await?;
        Ok(())
    }
}

/// Unauthenticated JSON POST used by the login/recovery endpoints.
/// Returns the raw response so callers can map statuses themselves.
pub async fn post_public<B: Serialize>(path: &str, body: &B) -> Result<Response, AppError> {
    let context = format!("POST {}", path);
    Request::post(&api_url(path))
        .json(body)
        .map_err(|e| AppError::fetch(&context, e))?
        .send()
        .await
        .map_err(|e| AppError::fetch(&context, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::realtime::ConnectionState;
    use crate::system::auth::gate::tests::{credentials, gate};
    use crate::system::auth::gate::{AuthStep, LoginOutcome};
    use crate::system::auth::storage::SessionStore;
    use futures_executor::block_on;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_two_rejected_requests_end_session_once() {
        let (gate, api, store, _connector) = gate();
        *api.login.borrow_mut() = Ok(LoginOutcome::Authenticated(credentials("jwt-9")));
        block_on(gate.login("e@x.com", "pw")).unwrap();
        let client = ApiClient::new(gate.clone());

        let deactivations = Rc::new(Cell::new(0));
        let counter = deactivations.clone();
        gate.channel().set_state_observer(move |state| {
            if state == ConnectionState::Inactive {
                counter.set(counter.get() + 1);
            }
        });

        // both requests left with the same token before either answer came back
        assert_eq!(client.settle(401, "jwt-9", "GET /jobs/me"), Err(AppError::Unauthorized));
        assert_eq!(client.settle(401, "jwt-9", "GET /jobs"), Err(AppError::Unauthorized));

        assert_eq!(deactivations.get(), 1);
        assert_eq!(gate.step(), AuthStep::Unauthenticated);
        assert!(store.load().is_none());
        assert!(gate.token().is_none());
    }

    #[test]
    fn test_other_failures_keep_session() {
        let (gate, api, store, _connector) = gate();
        *api.login.borrow_mut() = Ok(LoginOutcome::Authenticated(credentials("jwt-9")));
        block_on(gate.login("e@x.com", "pw")).unwrap();
        let client = ApiClient::new(gate.clone());

        assert!(client.settle(200, "jwt-9", "GET /jobs").is_ok());
        assert!(matches!(
            client.settle(500, "jwt-9", "GET /jobs"),
            Err(AppError::FetchFailed(_))
        ));
        assert_eq!(gate.token().as_deref(), Some("jwt-9"));
        assert!(store.load().is_some());
    }

    #[test]
    fn test_check_status() {
        assert!(check_status(204, "x").is_ok());
        assert_eq!(check_status(401, "x"), Err(AppError::Unauthorized));
        assert_eq!(
            check_status(500, "GET /jobs/me"),
            Err(AppError::FetchFailed("GET /jobs/me: HTTP 500".into()))
        );
    }

    #[test]
    fn test_join_base() {
        assert_eq!(
            join_base("ws:", "localhost", 8090, "/api/v1/ws/websocket"),
            "ws://localhost:8090/api/v1/ws/websocket"
        );
    }
}
