//! TopHeader component - application top navigation bar.
//!
//! Contains:
//! - Sidebar toggle and application title
//! - Realtime connection indicator
//! - User info and logout

use crate::layout::global_context::AppGlobalContext;
use crate::shared::icons::icon;
use crate::shared::realtime::ConnectionState;
use crate::system::auth::context::{use_auth, use_services};
use leptos::prelude::*;

#[component]
pub fn TopHeader() -> impl IntoView {
    let ctx =
        leptos::context::use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let services = StoredValue::new_local(use_services());
    let auth = use_auth();

    let toggle_sidebar = move |_| ctx.toggle_left();
    let logout = move |_| services.get_value().gate.logout();

    let user_label = move || {
        auth.with(|step| {
            step.session()
                .map(|s| format!("{} ({})", s.user.display_name(), s.role().display_name()))
                .unwrap_or_default()
        })
    };

    view! {
        <div class="top-header">
            <div class="top-header__brand">
                <button
                    class="top-header__icon-btn"
                    on:click=toggle_sidebar
                    title=move || if ctx.left_open.get() { "Ocultar menú" } else { "Mostrar menú" }
                >
                    {icon("menu")}
                </button>
                <span class="top-header__title">"Taller mecánico"</span>
            </div>

            <div class="top-header__actions">
                <Show when=move || ctx.is_disconnected()>
                    <div class="top-header__status top-header__status--offline" title="Reconectando...">
                        {icon("wifi-off")}
                        <span>"Sin conexión"</span>
                    </div>
                </Show>
                <Show when=move || ctx.connection.get() == ConnectionState::Connecting>
                    <div class="top-header__status">
                        <span>"Conectando..."</span>
                    </div>
                </Show>

                <div class="top-header__user">
                    {icon("user")}
                    <span>{user_label}</span>
                </div>

                <button class="top-header__icon-btn" on:click=logout title="Cerrar sesión">
                    {icon("log-out")}
                </button>
            </div>
        </div>
    }
}
