use contracts::domain::a001_maintenance_job::{JobProgress, RegisterProgressDto, UpdateProgressDto};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::domain::a001_maintenance_job::api::{
    delete_progress, fetch_progress, register_progress, update_progress,
};
use crate::layout::global_context::AppGlobalContext;
use crate::system::auth::context::use_services;

/// Hours as typed by the employee; blank means none yet
fn parse_hours(raw: &str) -> Result<f64, String> {
    let raw = raw.trim().replace(',', ".");
    if raw.is_empty() {
        return Ok(0.0);
    }
    match raw.parse::<f64>() {
        Ok(hours) if hours.is_finite() && hours >= 0.0 => Ok(hours),
        _ => Err("Las horas trabajadas no son válidas".into()),
    }
}

/// Progress report of one job: notes plus hours worked.
///
/// Loads the existing report when `job_id` changes; saving updates it in
/// place, or registers a first one.
#[component]
pub fn ProgressForm(
    /// Job being reported; `None` hides the form
    job_id: RwSignal<Option<i64>>,
) -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let services = StoredValue::new_local(use_services());
    let existing = RwSignal::new(None::<JobProgress>);
    let notes = RwSignal::new(String::new());
    let hours = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let fill = move |progress: Option<JobProgress>| {
        notes.set(progress.as_ref().map(|p| p.notes.clone()).unwrap_or_default());
        hours.set(
            progress
                .as_ref()
                .map(|p| p.hours_worked.to_string())
                .unwrap_or_default(),
        );
        existing.set(progress);
    };

    Effect::new(move |_| {
        let Some(id) = job_id.get() else {
            return;
        };
        fill(None);
        let client = services.get_value().api;
        busy.set(true);
        spawn_local(async move {
            match fetch_progress(&client, id).await {
                // a later selection may have replaced this one
                Ok(progress) if job_id.get_untracked() == Some(id) => fill(progress),
                Ok(_) => {}
                Err(e) => {
                    log::warn!("[jobs] progress of {} unavailable: {}", id, e);
                }
            }
            busy.set(false);
        });
    });

    let save = move |_| {
        let Some(maintenance_job_id) = job_id.get_untracked() else {
            return;
        };
        let hours_worked = match parse_hours(&hours.get_untracked()) {
            Ok(h) => h,
            Err(message) => {
                ctx.show_message(&message);
                return;
            }
        };
        let text = notes.get_untracked().trim().to_string();
        let current = existing.get_untracked().map(|p| p.id);
        let client = services.get_value().api;
        busy.set(true);
        spawn_local(async move {
            let result = match current {
                Some(id) => {
                    let dto = UpdateProgressDto { notes: text, hours_worked };
                    update_progress(&client, id, &dto).await
                }
                None => {
                    let dto = RegisterProgressDto {
                        maintenance_job_id,
                        notes: text,
                        hours_worked,
                    };
                    register_progress(&client, &dto).await
                }
            };
            match result {
                Ok(progress) => {
                    ctx.show_success("Progreso guardado correctamente");
                    fill(Some(progress));
                }
                Err(e) => ctx.show_error(&e),
            }
            busy.set(false);
        });
    };

    let remove = move |_| {
        let Some(id) = existing.get_untracked().map(|p| p.id) else {
            return;
        };
        let client = services.get_value().api;
        busy.set(true);
        spawn_local(async move {
            match delete_progress(&client, id).await {
                Ok(()) => {
                    ctx.show_success("Progreso eliminado correctamente");
                    fill(None);
                }
                Err(e) => ctx.show_error(&e),
            }
            busy.set(false);
        });
    };

    view! {
        <Show when=move || job_id.get().is_some()>
            <Card>
                <Flex vertical=true gap=FlexGap::Medium>
                    <h3>{move || format!("Avance del trabajo #{}", job_id.get().unwrap_or_default())}</h3>
                    <Textarea value=notes placeholder="Observaciones"/>
                    <Input value=hours placeholder="Horas trabajadas" input_type=InputType::Number/>
                    <Flex gap=FlexGap::Small>
                        <Button appearance=ButtonAppearance::Primary disabled=busy on_click=save>
                            {move || if existing.get().is_some() { "Actualizar" } else { "Guardar" }}
                        </Button>
                        <Show when=move || existing.get().is_some()>
                            <Button disabled=busy on_click=remove>"Eliminar"</Button>
                        </Show>
                        <Button on_click=move |_| job_id.set(None)>"Cancelar"</Button>
                    </Flex>
                </Flex>
            </Card>
        </Show>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hours() {
        assert_eq!(parse_hours(""), Ok(0.0));
        assert_eq!(parse_hours(" 2.5 "), Ok(2.5));
        assert_eq!(parse_hours("1,5"), Ok(1.5));
        assert!(parse_hours("-1").is_err());
        assert!(parse_hours("dos").is_err());
    }
}
