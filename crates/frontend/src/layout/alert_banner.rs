use crate::layout::global_context::AppGlobalContext;
use leptos::prelude::*;

/// Current alert of the shell, dismissible
#[component]
pub fn AlertBanner() -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");

    move || {
        ctx.alert.get().map(|alert| {
            view! {
                <div class=alert.kind.css_class() role="alert">
                    <span>{alert.text}</span>
                    <button class="alert__close" on:click=move |_| ctx.dismiss() title="Cerrar">
                        "×"
                    </button>
                </div>
            }
        })
    }
}
