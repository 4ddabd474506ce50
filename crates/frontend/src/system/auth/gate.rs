//! Authentication state machine
//!
//! `Unauthenticated -> AwaitingCode -> Authenticated`, with a direct jump to
//! `Authenticated` when the server does not ask for a second factor. The gate
//! is the only writer of the persisted session and the only caller of
//! `JobChannel::activate` / `deactivate`.

use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;
use contracts::system::auth::{ChangePasswordRequest, LoginRequest, UserInfo, VerifyCodeRequest};

use super::session::Session;
use super::storage::SessionStore;
use crate::shared::error::AppError;
use crate::shared::realtime::JobChannel;

#[derive(Debug, Clone, PartialEq)]
pub enum AuthStep {
    Unauthenticated,
    AwaitingCode { identifier: String },
    Authenticated(Session),
}

impl AuthStep {
    pub fn session(&self) -> Option<&Session> {
        match self {
            AuthStep::Authenticated(session) => Some(session),
            _ => None,
        }
    }
}

/// Token and identity issued by the server
#[derive(Debug, Clone, PartialEq)]
pub struct Credentials {
    pub token: String,
    pub user: UserInfo,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    SecondFactor,
    Authenticated(Credentials),
}

#[async_trait(?Send)]
pub trait AuthApi {
    async fn login(&self, request: &LoginRequest) -> Result<LoginOutcome, AppError>;
    async fn verify_code(&self, request: &VerifyCodeRequest) -> Result<Credentials, AppError>;
    async fn recover_password(&self, email: &str) -> Result<(), AppError>;
    async fn change_password(&self, request: &ChangePasswordRequest) -> Result<(), AppError>;
}

type StepObserver = Rc<dyn Fn(&AuthStep)>;

struct GateState {
    step: AuthStep,
    observer: Option<StepObserver>,
}

#[derive(Clone)]
pub struct AuthGate {
    api: Rc<dyn AuthApi>,
    store: Rc<dyn SessionStore>,
    channel: JobChannel,
    state: Rc<RefCell<GateState>>,
}

impl AuthGate {
    pub fn new(api: Rc<dyn AuthApi>, store: Rc<dyn SessionStore>, channel: JobChannel) -> Self {
        Self {
            api,
            store,
            channel,
            state: Rc::new(RefCell::new(GateState {
                step: AuthStep::Unauthenticated,
                observer: None,
            })),
        }
    }

    pub fn channel(&self) -> &JobChannel {
        &self.channel
    }

    pub fn step(&self) -> AuthStep {
        self.state.borrow().step.clone()
    }

    pub fn session(&self) -> Option<Session> {
        self.state.borrow().step.session().cloned()
    }

    pub fn token(&self) -> Option<String> {
        self.state.borrow().step.session().map(|s| s.token.clone())
    }

    pub fn set_observer(&self, observer: impl Fn(&AuthStep) + 'static) {
        self.state.borrow_mut().observer = Some(Rc::new(observer));
    }

    fn transition(&self, step: AuthStep) {
        let observer = {
            let mut state = self.state.borrow_mut();
            state.step = step.clone();
            state.observer.clone()
        };
        if let Some(observer) = observer {
            observer(&step);
        }
    }

    /// Rebuild the session persisted by a previous visit
    pub fn restore(&self) -> bool {
        match self.store.load() {
            Some(session) => {
                log::info!("[auth] restored session of user {}", session.user_id());
                let token = session.token.clone();
                self.transition(AuthStep::Authenticated(session));
                self.channel.activate(&token);
                true
            }
            None => false,
        }
    }

    /// First step. Returns the step reached.
    pub async fn login(&self, identifier: &str, secret: &str) -> Result<AuthStep, AppError> {
        let identifier = identifier.trim();
        if identifier.is_empty() || secret.is_empty() {
            return Err(AppError::InvalidCredentials);
        }

        let request = LoginRequest {
            email: identifier.to_string(),
            password: secret.to_string(),
        };
        match self.api.login(&request).await? {
            LoginOutcome::SecondFactor => {
                log::info!("[auth] second factor required");
                let step = AuthStep::AwaitingCode {
                    identifier: identifier.to_string(),
                };
                self.transition(step.clone());
                Ok(step)
            }
            LoginOutcome::Authenticated(credentials) => self.establish(credentials),
        }
    }

    /// Second step, for the identifier of the pending login
    pub async fn verify_code(&self, code: &str) -> Result<AuthStep, AppError> {
        let identifier = match self.step() {
            AuthStep::AwaitingCode { identifier } => identifier,
            _ => return Err(AppError::InvalidOrExpiredCode),
        };
        let code = code.trim();
        if code.is_empty() {
            return Err(AppError::InvalidOrExpiredCode);
        }

        let request = VerifyCodeRequest {
            email: identifier,
            code: code.to_string(),
        };
        match self.api.verify_code(&request).await {
            Ok(credentials) => self.establish(credentials),
            Err(e) => {
                log::warn!("[auth] code rejected: {}", e);
                Err(e)
            }
        }
    }

    /// Ask the server for a new code while awaiting one
    pub async fn resend_code(&self) -> Result<(), AppError> {
        match self.step() {
            AuthStep::AwaitingCode { identifier } => self.recover_password(&identifier).await,
            _ => Err(AppError::DeliveryFailed),
        }
    }

    /// Any failure surfaces as `DeliveryFailed`
    pub async fn recover_password(&self, identifier: &str) -> Result<(), AppError> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(AppError::DeliveryFailed);
        }
        self.api.recover_password(identifier).await.map_err(|e| {
            log::warn!("[auth] recovery request failed: {}", e);
            AppError::DeliveryFailed
        })
    }

    pub async fn change_password(
        &self,
        identifier: &str,
        code: &str,
        new_secret: &str,
    ) -> Result<(), AppError> {
        if code.trim().is_empty() {
            return Err(AppError::InvalidOrExpiredCode);
        }
        let request = ChangePasswordRequest {
            email: identifier.trim().to_string(),
            code: code.trim().to_string(),
            new_password: new_secret.to_string(),
        };
        self.api.change_password(&request).await
    }

    pub fn logout(&self) {
        log::info!("[auth] logout");
        self.teardown();
    }

    /// A request made with `token` was rejected. Ends that session once;
    /// returns whether anything was torn down.
    pub fn handle_unauthorized(&self, token: &str) -> bool {
        if self.token().as_deref() != Some(token) {
            return false;
        }
        log::warn!("[auth] token rejected by server, ending session");
        self.teardown();
        true
    }

    fn teardown(&self) {
        self.store.clear();
        self.channel.deactivate();
        self.transition(AuthStep::Unauthenticated);
    }

    fn establish(&self, credentials: Credentials) -> Result<AuthStep, AppError> {
        let session = Session::new(credentials.user, credentials.token);
        // Persist before anything can use the token
        self.store.save(&session)?;
        log::info!(
            "[auth] authenticated user {} as {}",
            session.user_id(),
            session.role().code()
        );
        let token = session.token.clone();
        let step = AuthStep::Authenticated(session);
        self.transition(step.clone());
        self.channel.activate(&token);
        Ok(step)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::shared::realtime::channel::tests::{channel, FakeConnector};
    use crate::shared::realtime::{ChannelLink, ConnectionState, Connector};
    use crate::system::auth::storage::MemorySessionStore;
    use contracts::enums::user_role::UserRole;
    use futures_executor::block_on;
    use std::cell::Cell;

    pub(crate) fn user(id: i64, role: UserRole) -> UserInfo {
        UserInfo {
            id,
            email: format!("user{}@taller.com", id),
            firstname: None,
            lastname: None,
            role,
        }
    }

    pub(crate) struct FakeAuthApi {
        pub login: RefCell<Result<LoginOutcome, AppError>>,
        pub verify: RefCell<Result<Credentials, AppError>>,
        pub recover: RefCell<Result<(), AppError>>,
        pub recover_calls: Cell<u32>,
    }

    impl Default for FakeAuthApi {
        fn default() -> Self {
            Self {
                login: RefCell::new(Ok(LoginOutcome::SecondFactor)),
                verify: RefCell::new(Err(AppError::InvalidOrExpiredCode)),
                recover: RefCell::new(Ok(())),
                recover_calls: Cell::new(0),
            }
        }
    }

    #[async_trait(?Send)]
    impl AuthApi for FakeAuthApi {
        async fn login(&self, _request: &LoginRequest) -> Result<LoginOutcome, AppError> {
            self.login.borrow().clone()
        }

        async fn verify_code(&self, _request: &VerifyCodeRequest) -> Result<Credentials, AppError> {
            self.verify.borrow().clone()
        }

        async fn recover_password(&self, _email: &str) -> Result<(), AppError> {
            self.recover_calls.set(self.recover_calls.get() + 1);
            self.recover.borrow().clone()
        }

        async fn change_password(&self, _request: &ChangePasswordRequest) -> Result<(), AppError> {
            Ok(())
        }
    }

    pub(crate) fn gate() -> (AuthGate, Rc<FakeAuthApi>, Rc<MemorySessionStore>, Rc<FakeConnector>) {
        let api = Rc::new(FakeAuthApi::default());
        let store = Rc::new(MemorySessionStore::default());
        let (channel, connector) = channel();
        (AuthGate::new(api.clone(), store.clone(), channel), api, store, connector)
    }

    pub(crate) fn credentials(token: &str) -> Credentials {
        Credentials {
            token: token.to_string(),
            user: user(7, UserRole::Employee),
        }
    }

    #[test]
    fn test_second_factor_is_driven_by_response() {
        let (gate, _api, store, connector) = gate();
        let step = block_on(gate.login("admin", "pw")).unwrap();
        assert_eq!(
            step,
            AuthStep::AwaitingCode {
                identifier: "admin".into()
            }
        );
        assert!(store.load().is_none());
        assert!(connector.links.borrow().is_empty());
    }

    #[test]
    fn test_login_without_second_factor_authenticates() {
        let (gate, api, store, connector) = gate();
        *api.login.borrow_mut() = Ok(LoginOutcome::Authenticated(credentials("jwt-1")));

        let step = block_on(gate.login("admin", "pw")).unwrap();
        assert!(matches!(step, AuthStep::Authenticated(_)));
        assert_eq!(store.load().unwrap().token, "jwt-1");
        assert_eq!(connector.last().token(), "jwt-1");
    }

    #[test]
    fn test_bad_credentials_stay_unauthenticated() {
        let (gate, api, _store, _connector) = gate();
        *api.login.borrow_mut() = Err(AppError::InvalidCredentials);
        assert_eq!(
            block_on(gate.login("e@x.com", "wrong")),
            Err(AppError::InvalidCredentials)
        );
        assert_eq!(gate.step(), AuthStep::Unauthenticated);
        assert_eq!(block_on(gate.login("", "pw")), Err(AppError::InvalidCredentials));
    }

    #[test]
    fn test_failed_code_keeps_awaiting_and_persists_nothing() {
        let (gate, _api, store, connector) = gate();
        block_on(gate.login("e@x.com", "pw")).unwrap();

        assert_eq!(
            block_on(gate.verify_code("0000")),
            Err(AppError::InvalidOrExpiredCode)
        );
        assert!(matches!(gate.step(), AuthStep::AwaitingCode { .. }));
        assert!(store.load().is_none());
        assert!(gate.token().is_none());
        assert!(connector.links.borrow().is_empty());
    }

    struct OrderCheckingConnector {
        store: Rc<MemorySessionStore>,
        persisted_first: Cell<Option<bool>>,
    }

    impl Connector for OrderCheckingConnector {
        fn connect(&self, _link: ChannelLink) {
            self.persisted_first.set(Some(self.store.load().is_some()));
        }
    }

    #[test]
    fn test_token_persisted_before_channel_activation() {
        let api = Rc::new(FakeAuthApi::default());
        *api.verify.borrow_mut() = Ok(credentials("jwt-2"));
        let store = Rc::new(MemorySessionStore::default());
        let connector = Rc::new(OrderCheckingConnector {
            store: store.clone(),
            persisted_first: Cell::new(None),
        });
        let gate = AuthGate::new(api, store.clone(), JobChannel::new(connector.clone()));

        block_on(gate.login("e@x.com", "pw")).unwrap();
        let step = block_on(gate.verify_code("123456")).unwrap();

        assert_eq!(step.session().unwrap().token, "jwt-2");
        assert_eq!(connector.persisted_first.get(), Some(true));
    }

    #[test]
    fn test_concurrent_unauthorized_tears_down_once() {
        let (gate, api, store, _connector) = gate();
        *api.login.borrow_mut() = Ok(LoginOutcome::Authenticated(credentials("jwt-3")));
        block_on(gate.login("e@x.com", "pw")).unwrap();

        let deactivations = Rc::new(Cell::new(0));
        let counter = deactivations.clone();
        gate.channel().set_state_observer(move |state| {
            if state == ConnectionState::Inactive {
                counter.set(counter.get() + 1);
            }
        });

        assert!(gate.handle_unauthorized("jwt-3"));
        assert!(!gate.handle_unauthorized("jwt-3"));
        assert_eq!(deactivations.get(), 1);
        assert_eq!(gate.step(), AuthStep::Unauthenticated);
        assert!(store.load().is_none());
    }

    #[test]
    fn test_stale_unauthorized_does_not_end_new_session() {
        let (gate, api, _store, _connector) = gate();
        *api.login.borrow_mut() = Ok(LoginOutcome::Authenticated(credentials("old")));
        block_on(gate.login("e@x.com", "pw")).unwrap();
        *api.login.borrow_mut() = Ok(LoginOutcome::Authenticated(credentials("new")));
        block_on(gate.login("e@x.com", "pw")).unwrap();

        assert!(!gate.handle_unauthorized("old"));
        assert_eq!(gate.token().as_deref(), Some("new"));
    }

    #[test]
    fn test_recovery_errors_are_generic() {
        let (gate, api, _store, _connector) = gate();
        *api.recover.borrow_mut() = Err(AppError::fetch("POST /auth/recover-password", "HTTP 404"));
        assert_eq!(
            block_on(gate.recover_password("ghost@x.com")),
            Err(AppError::DeliveryFailed)
        );
    }

    #[test]
    fn test_resend_code_reissues_for_pending_identifier() {
        let (gate, api, _store, _connector) = gate();
        assert_eq!(block_on(gate.resend_code()), Err(AppError::DeliveryFailed));
        assert_eq!(api.recover_calls.get(), 0);

        block_on(gate.login("e@x.com", "pw")).unwrap();
        assert_eq!(block_on(gate.resend_code()), Ok(()));
        assert_eq!(api.recover_calls.get(), 1);
        assert!(matches!(gate.step(), AuthStep::AwaitingCode { .. }));
    }

    #[test]
    fn test_restore_and_logout() {
        let api = Rc::new(FakeAuthApi::default());
        let session = Session::new(user(4, UserRole::Customer), "saved".into());
        let store = Rc::new(MemorySessionStore::with_session(session));
        let (channel, connector) = channel();
        let gate = AuthGate::new(api, store.clone(), channel);

        assert!(gate.restore());
        assert_eq!(gate.session().unwrap().role(), UserRole::Customer);
        assert_eq!(connector.live_count(), 1);

        gate.logout();
        assert_eq!(gate.step(), AuthStep::Unauthenticated);
        assert!(store.load().is_none());
        assert_eq!(connector.live_count(), 0);
    }
}
