//! Sidebar with the sections of the signed-in role

use crate::dashboards::{resolve_section, sections_for};
use crate::layout::global_context::AppGlobalContext;
use crate::shared::icons::icon;
use crate::system::auth::context::use_auth;
use leptos::prelude::*;

#[component]
pub fn Sidebar() -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let auth = use_auth();

    let role = move || auth.with(|step| step.session().map(|s| s.role()));

    view! {
        <div class="app-sidebar__content">
            {move || role().map(|role| {
                sections_for(role).iter().map(|section| {
                    let key = section.key;
                    let is_active = move || resolve_section(role, ctx.section.get().as_deref()).key == key;
                    view! {
                        <div
                            class="app-sidebar__item"
                            class:app-sidebar__item--active=is_active
                            style:padding-left="12px"
                            on:click=move |_| ctx.set_section(key)
                        >
                            <div class="app-sidebar__item-content">
                                {icon(section.icon)}
                                <span>{section.label}</span>
                            </div>
                        </div>
                    }
                }).collect_view()
            })}
        </div>
    }
}
