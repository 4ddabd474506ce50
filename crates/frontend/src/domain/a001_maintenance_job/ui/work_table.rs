use leptos::prelude::*;
use thaw::*;

use crate::domain::a001_maintenance_job::view_model::{WorkItem, WorkStatus};

fn status_color(status: WorkStatus) -> BadgeColor {
    match status {
        WorkStatus::Asignado => BadgeColor::Warning,
        WorkStatus::EnCurso => BadgeColor::Brand,
        WorkStatus::Finalizado => BadgeColor::Success,
    }
}

#[component]
pub fn StatusBadge(status: WorkStatus) -> impl IntoView {
    view! {
        <Badge appearance=BadgeAppearance::Tint color=status_color(status)>
            {status.label()}
        </Badge>
    }
}

/// Tabla de trabajos con acciones opcionales por fila
#[component]
pub fn WorkTable(
    #[prop(into)] items: Signal<Vec<WorkItem>>,
    #[prop(optional)] show_assignee: bool,
    #[prop(optional)] on_start: Option<Callback<i64>>,
    #[prop(optional)] on_finish: Option<Callback<i64>>,
    #[prop(optional)] on_support: Option<Callback<i64>>,
    #[prop(optional)] on_progress: Option<Callback<i64>>,
    #[prop(optional)] on_edit: Option<Callback<i64>>,
    #[prop(optional)] on_delete: Option<Callback<i64>>,
) -> impl IntoView {
    let has_actions = [on_start, on_finish, on_support, on_progress, on_edit, on_delete]
        .iter()
        .any(Option::is_some);

    view! {
        <Show
            when=move || items.with(|items| !items.is_empty())
            fallback=|| view! { <div class="empty-state">"No hay trabajos"</div> }
        >
            <Table>
                <TableHeader>
                    <TableRow>
                        <TableHeaderCell>"Vehículo"</TableHeaderCell>
                        <TableHeaderCell>"Tipo"</TableHeaderCell>
                        <TableHeaderCell>"Estado"</TableHeaderCell>
                        <TableHeaderCell>"Inicio"</TableHeaderCell>
                        <TableHeaderCell>"Tiempo estimado"</TableHeaderCell>
                        <TableHeaderCell>"Observaciones"</TableHeaderCell>
                        {show_assignee.then(|| view! { <TableHeaderCell>"Asignado a"</TableHeaderCell> })}
                        {has_actions.then(|| view! { <TableHeaderCell>""</TableHeaderCell> })}
                    </TableRow>
                </TableHeader>
                <TableBody>
                    {move || {
                        items
                            .get()
                            .into_iter()
                            .map(|item| {
                                let id = item.id;
                                let status = item.status;
                                let assignee = item.assigned_to.clone().unwrap_or_else(|| "-".to_string());
                                view! {
                                    <TableRow>
                                        <TableCell>{item.vehicle}</TableCell>
                                        <TableCell>{item.job_type}</TableCell>
                                        <TableCell><StatusBadge status=status/></TableCell>
                                        <TableCell>{item.start_date}</TableCell>
                                        <TableCell>{item.estimated_time}</TableCell>
                                        <TableCell>{item.observations}</TableCell>
                                        {show_assignee.then(|| view! { <TableCell>{assignee}</TableCell> })}
                                        {has_actions.then(|| view! {
                                            <TableCell>
                                                <Flex gap=FlexGap::Small>
                                                    {on_start.filter(|_| status == WorkStatus::Asignado).map(|cb| view! {
                                                        <Button
                                                            size=ButtonSize::Small
                                                            appearance=ButtonAppearance::Primary
                                                            on_click=move |_| cb.run(id)
                                                        >
                                                            "Iniciar"
                                                        </Button>
                                                    })}
                                                    {on_finish.filter(|_| status == WorkStatus::EnCurso).map(|cb| view! {
                                                        <Button
                                                            size=ButtonSize::Small
                                                            appearance=ButtonAppearance::Primary
                                                            on_click=move |_| cb.run(id)
                                                        >
                                                            "Finalizar"
                                                        </Button>
                                                    })}
                                                    {on_support.filter(|_| !status.is_terminal()).map(|cb| view! {
                                                        <Button
                                                            size=ButtonSize::Small
                                                            on_click=move |_| cb.run(id)
                                                        >
                                                            "Solicitar apoyo"
                                                        </Button>
                                                    })}
                                                    {on_progress.map(|cb| view! {
                                                        <Button
                                                            size=ButtonSize::Small
                                                            on_click=move |_| cb.run(id)
                                                        >
                                                            "Registrar avance"
                                                        </Button>
                                                    })}
                                                    {on_edit.map(|cb| view! {
                                                        <Button
                                                            size=ButtonSize::Small
                                                            on_click=move |_| cb.run(id)
                                                        >
                                                            "Editar"
                                                        </Button>
                                                    })}
                                                    {on_delete.map(|cb| view! {
                                                        <Button
                                                            size=ButtonSize::Small
                                                            on_click=move |_| cb.run(id)
                                                        >
                                                            "Eliminar"
                                                        </Button>
                                                    })}
                                                </Flex>
                                            </TableCell>
                                        })}
                                    </TableRow>
                                }
                            })
                            .collect_view()
                    }}
                </TableBody>
            </Table>
        </Show>
    }
}
