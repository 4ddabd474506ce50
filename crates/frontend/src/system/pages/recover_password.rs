use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::system::auth::context::use_services;

/// Password recovery: request a code by email, then set a new password
#[component]
pub fn RecoverPasswordPage(on_back: Callback<()>) -> impl IntoView {
    let services = StoredValue::new_local(use_services());
    let (email, set_email) = signal(String::new());
    let (code, set_code) = signal(String::new());
    let (new_password, set_new_password) = signal(String::new());
    let (confirm, set_confirm) = signal(String::new());
    let (code_sent, set_code_sent) = signal(false);
    let (error_message, set_error_message) = signal(Option::<String>::None);
    let (notice, set_notice) = signal(Option::<String>::None);
    let (is_loading, set_is_loading) = signal(false);

    let request_code = move || {
        let gate = services.get_value().gate;
        let email_val = email.get_untracked();
        set_is_loading.set(true);
        set_error_message.set(None);
        set_notice.set(None);
        spawn_local(async move {
            match gate.recover_password(&email_val).await {
                Ok(()) => {
                    set_code_sent.set(true);
                    set_notice.set(Some(
                        "Si el correo está registrado, recibirás un código".to_string(),
                    ));
                }
                Err(e) => set_error_message.set(Some(e.user_message())),
            }
            set_is_loading.set(false);
        });
    };

    let on_request = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        request_code();
    };

    let on_change = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let password_val = new_password.get_untracked();
        if password_val != confirm.get_untracked() {
            set_error_message.set(Some("Las contraseñas no coinciden".to_string()));
            return;
        }
        let gate = services.get_value().gate;
        let email_val = email.get_untracked();
        let code_val = code.get_untracked();
        set_is_loading.set(true);
        set_error_message.set(None);
        spawn_local(async move {
            match gate.change_password(&email_val, &code_val, &password_val).await {
                Ok(()) => {
                    log::info!("[auth] password changed");
                    on_back.run(());
                }
                Err(e) => {
                    set_error_message.set(Some(e.user_message()));
                    set_is_loading.set(false);
                }
            }
        });
    };

    view! {
        <div class="login-container">
            <div class="login-box">
                <h1>"Taller mecánico"</h1>
                <h2>"Recuperar contraseña"</h2>

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

                <Show
                    when=move || code_sent.get()
                    fallback=move || view! {
                        <form on:submit=on_request>
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
                            <button type="submit" class="btn-primary" disabled=move || is_loading.get()>
                                "Enviar código"
                            </button>
                        </form>
                    }
                >
                    <form on:submit=on_change>
                        <div class="form-group">
                            <label for="code">"Código"</label>
                            <input
                                type="text"
                                id="code"
                                inputmode="numeric"
                                value=move || code.get()
                                on:input=move |ev| set_code.set(event_target_value(&ev))
                                required
                            />
                        </div>
                        <div class="form-group">
                            <label for="new-password">"Nueva contraseña"</label>
                            <input
                                type="password"
                                id="new-password"
                                value=move || new_password.get()
                                on:input=move |ev| set_new_password.set(event_target_value(&ev))
                                required
                            />
                        </div>
                        <div class="form-group">
                            <label for="confirm-password">"Confirmar contraseña"</label>
                            <input
                                type="password"
                                id="confirm-password"
                                value=move || confirm.get()
                                on:input=move |ev| set_confirm.set(event_target_value(&ev))
                                required
                            />
                        </div>
                        <button type="submit" class="btn-primary" disabled=move || is_loading.get()>
                            "Cambiar contraseña"
                        </button>
                        <button
                            type="button"
                            class="btn-link"
                            disabled=move || is_loading.get()
                            on:click=move |_| request_code()
                        >
                            "Reenviar código"
                        </button>
                    </form>
                </Show>

                <div class="login-info">
                    <a href="#" on:click=move |ev| {
                        ev.prevent_default();
                        on_back.run(());
                    }>
                        "Volver al inicio de sesión"
                    </a>
                </div>
            </div>
        </div>
    }
}
