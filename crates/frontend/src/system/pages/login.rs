use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::system::auth::context::{use_auth, use_services};
use crate::system::auth::gate::AuthStep;

#[component]
pub fn LoginPage(
    /// Opens the password recovery form
    on_recover: Callback<()>,
) -> impl IntoView {
    let auth = use_auth();
    let awaiting_code = move || matches!(auth.get(), AuthStep::AwaitingCode { .. });

    view! {
        <div class="login-container">
            <div class="login-box">
                <h1>"Taller mecánico"</h1>
                <Show
                    when=awaiting_code
                    fallback=move || view! { <CredentialsForm on_recover=on_recover/> }
                >
                    <CodeForm/>
                </Show>
            </div>
        </div>
    }
}

#[component]
fn CredentialsForm(on_recover: Callback<()>) -> impl IntoView {
    let services = StoredValue::new_local(use_services());
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (error_message, set_error_message) = signal(Option::<String>::None);
    let (is_loading, set_is_loading) = signal(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();

        let gate = services.get_value().gate;
        let email_val = email.get_untracked();
        let password_val = password.get_untracked();

        set_is_loading.set(true);
        set_error_message.set(None);

        spawn_local(async move {
            // On success the gate moves on and this form unmounts
            if let Err(e) = gate.login(&email_val, &password_val).await {
                set_error_message.set(Some(e.user_message()));
            }
            set_is_loading.set(false);
        });
    };

    view! {
        <h2>"Iniciar sesión"</h2>

        <Show when=move || error_message.get().is_some()>
            <div class="error-message">
                {move || error_message.get().unwrap_or_default()}
            </div>
        </Show>

        <form on:submit=on_submit>
            <div class="form-group">
                <label for="email">"Correo electrónico"</label>
                <input
                    type="email"
                    id="email"
                    value=move || email.get()
                    on:input=move |ev| set_email.set(event_target_value(&ev))
                    required
                    disabled=move || is_loading.get()
                />
            </div>

            <div class="form-group">
                <label for="password">"Contraseña"</label>
                <input
                    type="password"
                    id="password"
                    value=move || password.get()
                    on:input=move |ev| set_password.set(event_target_value(&ev))
                    required
                    disabled=move || is_loading.get()
                />
            </div>

            <button type="submit" class="btn-primary" disabled=move || is_loading.get()>
                {move || if is_loading.get() { "Ingresando..." } else { "Ingresar" }}
            </button>
        </form>

        <div class="login-info">
            <a href="#" on:click=move |ev| {
                ev.prevent_default();
                on_recover.run(());
            }>
                "¿Olvidaste tu contraseña?"
            </a>
        </div>
    }
}

#[component]
fn CodeForm() -> impl IntoView {
    let services = StoredValue::new_local(use_services());
    let auth = use_auth();
    let (code, set_code) = signal(String::new());
    let (error_message, set_error_message) = signal(Option::<String>::None);
    let (notice, set_notice) = signal(Option::<String>::None);
    let (is_loading, set_is_loading) = signal(false);

    let identifier = move || match auth.get() {
        AuthStep::AwaitingCode { identifier } => identifier,
        _ => String::new(),
    };

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();

        let gate = services.get_value().gate;
        let code_val = code.get_untracked();

        set_is_loading.set(true);
        set_error_message.set(None);

        spawn_local(async move {
            if let Err(e) = gate.verify_code(&code_val).await {
                set_error_message.set(Some(e.user_message()));
            }
            set_is_loading.set(false);
        });
    };

    let resend = move |_| {
        let gate = services.get_value().gate;
        set_notice.set(None);
        set_error_message.set(None);
        spawn_local(async move {
            match gate.resend_code().await {
                Ok(()) => set_notice.set(Some("Te enviamos un nuevo código".to_string())),
                Err(e) => set_error_message.set(Some(e.user_message())),
            }
        });
    };

    let back = move |_| services.get_value().gate.logout();

    view! {
        <h2>"Verificación"</h2>
        <p>{move || format!("Ingresa el código enviado a {}", identifier())}</p>

        <Show when=move || error_message.get().is_some()>
            <div class="error-message">
                {move || error_message.get().unwrap_or_default()}
            </div>
        </Show>
        <Show when=move || notice.get().is_some()>
            <div class="info-message">
                {move || notice.get().unwrap_or_default()}
            </div>
        </Show>

        <form on:submit=on_submit>
            <div class="form-group">
                <label for="code">"Código"</label>
                <input
                    type="text"
                    id="code"
                    inputmode="numeric"
                    autocomplete="one-time-code"
                    value=move || code.get()
                    on:input=move |ev| set_code.set(event_target_value(&ev))
                    required
                    disabled=move || is_loading.get()
                />
            </div>

            <button type="submit" class="btn-primary" disabled=move || is_loading.get()>
                {move || if is_loading.get() { "Verificando..." } else { "Verificar" }}
            </button>
        </form>

        <div class="login-info">
            <button type="button" class="btn-link" on:click=resend>"Reenviar código"</button>
            <button type="button" class="btn-link" on:click=back>"Volver"</button>
        </div>
    }
}
