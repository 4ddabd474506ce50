use contracts::enums::user_role::UserRole;
use leptos::prelude::*;
use web_sys::window;

use crate::dashboards::RoleDashboard;
use crate::layout::global_context::AppGlobalContext;
use crate::layout::Shell;
use crate::system::auth::context::use_auth;
use crate::system::pages::login::LoginPage;
use crate::system::pages::recover_password::RecoverPasswordPage;

/// Keep the address bar on the dashboard of the current role
fn sync_location(path: &str) {
    let Some(w) = window() else {
        return;
    };
    let current = w.location().pathname().unwrap_or_default();
    if current == path {
        return;
    }
    if let Ok(history) = w.history() {
        let _ = history.replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(path));
    }
}

#[component]
fn MainLayout(role: UserRole) -> impl IntoView {
    view! {
        <Shell>
            <RoleDashboard role=role />
        </Shell>
    }
}

#[component]
pub fn AppRoutes() -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let auth = use_auth();
    let show_recover = RwSignal::new(false);

    let role = Memo::new(move |_| auth.with(|step| step.session().map(|s| s.role())));

    Effect::new(move |_| {
        let path = match role.get() {
            Some(role) => role.dashboard_path(),
            None => "/",
        };
        ctx.section.set(None);
        sync_location(path);
    });

    let open_recover = Callback::new(move |_: ()| show_recover.set(true));
    let close_recover = Callback::new(move |_: ()| show_recover.set(false));

    move || match role.get() {
        Some(role) => view! { <MainLayout role=role /> }.into_any(),
        None if show_recover.get() => {
            view! { <RecoverPasswordPage on_back=close_recover /> }.into_any()
        }
        None => view! { <LoginPage on_recover=open_recover /> }.into_any(),
    }
}
