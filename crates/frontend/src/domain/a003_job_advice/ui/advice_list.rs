use contracts::domain::a003_job_advice::JobAdvice;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::domain::a003_job_advice::api::{fetch_job_advice, review_job_advice};
use crate::layout::global_context::AppGlobalContext;
use crate::shared::components::page_header::PageHeader;
use crate::shared::date_utils::format_datetime;
use crate::system::auth::context::use_services;

#[derive(Clone, Debug, PartialEq)]
struct AdviceRow {
    id: i64,
    job: String,
    vehicle: String,
    requested_by: String,
    description: String,
    status: String,
    created_at: String,
    closed: bool,
}

impl From<JobAdvice> for AdviceRow {
    fn from(advice: JobAdvice) -> Self {
        Self {
            id: advice.id,
            job: format!("#{} {}", advice.maintenance_job.id, advice.maintenance_job.description),
            vehicle: advice.maintenance_job.vehicle.label(),
            requested_by: advice
                .requested_by
                .as_ref()
                .map(|e| e.user.full_name())
                .unwrap_or_else(|| "-".to_string()),
            closed: advice.is_closed(),
            description: advice.description,
            status: advice.status,
            created_at: advice
                .created_at
                .as_deref()
                .map(format_datetime)
                .unwrap_or_default(),
        }
    }
}

/// Specialist view: support requests and their review
#[component]
pub fn JobAdviceList() -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let services = StoredValue::new_local(use_services());
    let rows = RwSignal::new(Vec::<AdviceRow>::new());
    let loading = RwSignal::new(false);
    let reviewing = RwSignal::new(None::<i64>);
    let notes = RwSignal::new(String::new());

    let fetch = move || {
        let client = services.get_value().api;
        loading.set(true);
        spawn_local(async move {
            match fetch_job_advice(&client).await {
                Ok(items) => rows.set(items.into_iter().map(AdviceRow::from).collect()),
                Err(e) => ctx.show_error(&e),
            }
            loading.set(false);
        });
    };

    let submit_review = move |_| {
        let Some(id) = reviewing.get_untracked() else {
            return;
        };
        let text = notes.get_untracked();
        if text.trim().is_empty() {
            ctx.show_message("Agrega notas para la revisión");
            return;
        }
        let client = services.get_value().api;
        spawn_local(async move {
            match review_job_advice(&client, id, text.trim().to_string()).await {
                Ok(()) => {
                    ctx.show_success("Revisión registrada");
                    reviewing.set(None);
                    notes.set(String::new());
                    fetch();
                }
                Err(e) => ctx.show_error(&e),
            }
        });
    };

    fetch();

    view! {
        <div class="page">
            <PageHeader title="Solicitudes de apoyo" loading=loading>
                <Button on_click=move |_| fetch()>"Actualizar"</Button>
            </PageHeader>

            <Table>
                <TableHeader>
                    <TableRow>
                        <TableHeaderCell>"Trabajo"</TableHeaderCell>
                        <TableHeaderCell>"Vehículo"</TableHeaderCell>
                        <TableHeaderCell>"Solicitado por"</TableHeaderCell>
                        <TableHeaderCell>"Descripción"</TableHeaderCell>
                        <TableHeaderCell>"Fecha"</TableHeaderCell>
                        <TableHeaderCell>"Estado"</TableHeaderCell>
                        <TableHeaderCell>""</TableHeaderCell>
                    </TableRow>
                </TableHeader>
                <TableBody>
                    {move || rows.get().into_iter().map(|row| {
                        let id = row.id;
                        let closed = row.closed;
                        view! {
                            <TableRow>
                                <TableCell>{row.job}</TableCell>
                                <TableCell>{row.vehicle}</TableCell>
                                <TableCell>{row.requested_by}</TableCell>
                                <TableCell>{row.description}</TableCell>
                                <TableCell>{row.created_at}</TableCell>
                                <TableCell>
                                    <Badge
                                        appearance=BadgeAppearance::Tint
                                        color=if closed { BadgeColor::Success } else { BadgeColor::Warning }
                                    >
                                        {row.status}
                                    </Badge>
                                </TableCell>
                                <TableCell>
                                    {(!closed).then(|| view! {
                                        <Button
                                            size=ButtonSize::Small
                                            appearance=ButtonAppearance::Primary
                                            on_click=move |_| reviewing.set(Some(id))
                                        >
                                            "Revisar"
                                        </Button>
                                    })}
                                </TableCell>
                            </TableRow>
                        }
                    }).collect_view()}
                </TableBody>
            </Table>

            <Show when=move || reviewing.get().is_some()>
                <Card>
                    <Flex vertical=true gap=FlexGap::Medium>
                        <h3>{move || format!("Revisión de la solicitud #{}", reviewing.get().unwrap_or_default())}</h3>
                        <Textarea value=notes placeholder="Notas para el empleado"/>
                        <Flex gap=FlexGap::Small>
                            <Button appearance=ButtonAppearance::Primary on_click=submit_review>
                                "Guardar revisión"
                            </Button>
                            <Button on_click=move |_| reviewing.set(None)>"Cancelar"</Button>
                        </Flex>
                    </Flex>
                </Card>
            </Show>
        </div>
    }
}
