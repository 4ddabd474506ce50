use std::rc::Rc;

use leptos::prelude::*;

use super::api::HttpAuthApi;
use super::gate::{AuthGate, AuthStep};
use super::session::Session;
use super::storage::{browser_storage_available, BrowserSessionStore, MemorySessionStore, SessionStore};
use crate::layout::global_context::AppGlobalContext;
use crate::shared::api_utils::ApiClient;
use crate::shared::realtime::{JobChannel, WebSocketConnector};

/// Session-scoped services shared by every page
#[derive(Clone)]
pub struct AppServices {
    pub gate: AuthGate,
    pub api: ApiClient,
}

impl AppServices {
    pub fn browser() -> Self {
        let channel = JobChannel::new(Rc::new(WebSocketConnector::from_config()));
        let store: Rc<dyn SessionStore> = if browser_storage_available() {
            Rc::new(BrowserSessionStore)
        } else {
            log::warn!("[auth] localStorage unavailable, session will not survive a reload");
            Rc::new(MemorySessionStore::default())
        };
        let gate = AuthGate::new(Rc::new(HttpAuthApi), store, channel);
        let api = ApiClient::new(gate.clone());
        Self { gate, api }
    }

    pub fn channel(&self) -> &JobChannel {
        self.gate.channel()
    }
}

/// Auth context provider component
///
/// Builds the services, mirrors gate and channel state into signals and
/// restores a persisted session.
#[component]
pub fn AuthProvider(children: ChildrenFn) -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let services = AppServices::browser();
    let auth_step = RwSignal::new(AuthStep::Unauthenticated);

    services.gate.set_observer(move |step| auth_step.set(step.clone()));
    services
        .channel()
        .set_state_observer(move |state| ctx.connection.set(state));
    services.gate.restore();

    provide_context(StoredValue::new_local(services));
    provide_context(auth_step);

    children()
}

pub fn use_services() -> AppServices {
    use_context::<StoredValue<AppServices, LocalStorage>>()
        .expect("AuthProvider not found in component tree")
        .get_value()
}

/// Hook to access the current auth step
pub fn use_auth() -> RwSignal<AuthStep> {
    use_context::<RwSignal<AuthStep>>().expect("AuthProvider not found in component tree")
}

/// Session of the signed-in user, untracked
pub fn current_session() -> Option<Session> {
    use_auth().with_untracked(|step| step.session().cloned())
}
