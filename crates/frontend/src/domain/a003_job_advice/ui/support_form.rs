use contracts::domain::a003_job_advice::RequestSupportDto;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::domain::a003_job_advice::api::request_support;
use crate::layout::global_context::AppGlobalContext;
use crate::system::auth::context::use_services;

/// Inline form shown under the employee's job list
#[component]
pub fn SupportRequestForm(
    /// Job the request is for; `None` hides the form
    job_id: RwSignal<Option<i64>>,
) -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let services = StoredValue::new_local(use_services());
    let description = RwSignal::new(String::new());
    let sending = RwSignal::new(false);

    let submit = move |_| {
        let Some(maintenance_job_id) = job_id.get_untracked() else {
            return;
        };
        let text = description.get_untracked();
        if text.trim().is_empty() {
            ctx.show_message("Describe el problema antes de enviar");
            return;
        }
        let client = services.get_value().api;
        sending.set(true);
        spawn_local(async move {
            let dto = RequestSupportDto {
                maintenance_job_id,
                description: text.trim().to_string(),
            };
            match request_support(&client, &dto).await {
                Ok(()) => {
                    ctx.show_success("Solicitud de apoyo enviada");
                    description.set(String::new());
                    job_id.set(None);
                }
                Err(e) => ctx.show_error(&e),
            }
            sending.set(false);
        });
    };

    view! {
        <Show when=move || job_id.get().is_some()>
            <Card>
                <Flex vertical=true gap=FlexGap::Medium>
                    <h3>{move || format!("Solicitar apoyo para el trabajo #{}", job_id.get().unwrap_or_default())}</h3>
                    <Textarea value=description placeholder="¿Qué necesitas del especialista?"/>
                    <Flex gap=FlexGap::Small>
                        <Button
                            appearance=ButtonAppearance::Primary
                            disabled=sending
                            on_click=submit
                        >
                            "Enviar"
                        </Button>
                        <Button on_click=move |_| job_id.set(None)>"Cancelar"</Button>
                    </Flex>
                </Flex>
            </Card>
        </Show>
    }
}
