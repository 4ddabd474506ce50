use leptos::prelude::*;
use thaw::Spinner;

/// Page title bar with an action area on the right
#[component]
pub fn PageHeader(
    #[prop(into)]
    title: String,

    #[prop(optional, into)]
    subtitle: MaybeProp<String>,

    /// Shows a spinner next to the title while set
    #[prop(optional, into)]
    loading: MaybeProp<bool>,

    children: Children,
) -> impl IntoView {
    view! {
        <div class="page-header">
            <div class="page-header__content">
                <div class="page-header__text">
                    <h1 class="page-header__title">{title}</h1>
                    {move || subtitle.get().map(|s| view! {
                        <div class="page-header__subtitle">{s}</div>
                    })}
                </div>
                <Show when=move || loading.get().unwrap_or(false)>
                    <Spinner/>
                </Show>
            </div>
            <div class="page-header__actions">
                {children()}
            </div>
        </div>
    }
}
