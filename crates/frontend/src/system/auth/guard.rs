use contracts::enums::user_role::UserRole;
use leptos::prelude::*;

use super::context::use_auth;

/// Renders children only for users with one of `roles`
#[component]
pub fn RequireRole(roles: Vec<UserRole>, children: ChildrenFn) -> impl IntoView {
    let auth = use_auth();
    let allowed = move || {
        auth.with(|step| {
            step.session()
                .map(|s| roles.contains(&s.role()))
                .unwrap_or(false)
        })
    };

    view! {
        <Show
            when=allowed
            fallback=|| view! { <div class="warning-box">"Acceso denegado"</div> }
        >
            {children()}
        </Show>
    }
}
