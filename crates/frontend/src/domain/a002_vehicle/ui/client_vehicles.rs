use contracts::domain::a002_vehicle::{ClientJob, ClientVehicle};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::domain::a001_maintenance_job::ui::work_table::StatusBadge;
use crate::domain::a001_maintenance_job::view_model::WorkStatus;
use crate::domain::a002_vehicle::api::fetch_client_vehicles;
use crate::layout::global_context::AppGlobalContext;
use crate::shared::components::page_header::PageHeader;
use crate::shared::date_utils::{estimated_duration, format_date};
use crate::system::auth::context::use_services;

/// Customer view: own vehicles and the work done on them
#[component]
pub fn ClientVehicles() -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let services = StoredValue::new_local(use_services());
    let vehicles = RwSignal::new(Vec::<ClientVehicle>::new());
    let loading = RwSignal::new(false);

    let fetch = move || {
        let client = services.get_value().api;
        loading.set(true);
        spawn_local(async move {
            match fetch_client_vehicles(&client).await {
                Ok(items) => vehicles.set(items),
                Err(e) => ctx.show_error(&e),
            }
            loading.set(false);
        });
    };

    fetch();

    view! {
        <div class="page">
            <PageHeader title="Mis vehículos" loading=loading>
                <Button on_click=move |_| fetch()>"Actualizar"</Button>
            </PageHeader>

            <Show
                when=move || !vehicles.with(|v| v.is_empty())
                fallback=move || view! { <p>"No tienes vehículos registrados"</p> }
            >
                <Flex vertical=true gap=FlexGap::Large>
                    {move || vehicles.get().into_iter().map(|vehicle| view! {
                        <VehicleCard vehicle=vehicle/>
                    }).collect_view()}
                </Flex>
            </Show>
        </div>
    }
}

#[component]
fn VehicleCard(vehicle: ClientVehicle) -> impl IntoView {
    let title = format!(
        "{} {} ({}) {}",
        vehicle.brand, vehicle.model, vehicle.license_plate, vehicle.year
    );
    let jobs = vehicle.jobs;

    view! {
        <Card>
            <h3>{title}</h3>
            {if jobs.is_empty() {
                view! { <p>"Sin trabajos registrados"</p> }.into_any()
            } else {
                view! {
                    <Table>
                        <TableHeader>
                            <TableRow>
                                <TableHeaderCell>"Trabajo"</TableHeaderCell>
                                <TableHeaderCell>"Descripción"</TableHeaderCell>
                                <TableHeaderCell>"Fecha"</TableHeaderCell>
                                <TableHeaderCell>"Duración estimada"</TableHeaderCell>
                                <TableHeaderCell>"Estado"</TableHeaderCell>
                            </TableRow>
                        </TableHeader>
                        <TableBody>
                            {jobs.into_iter().map(job_row).collect_view()}
                        </TableBody>
                    </Table>
                }.into_any()
            }}
        </Card>
    }
}

fn job_row(job: ClientJob) -> impl IntoView {
    let status = WorkStatus::from_server_or_default(&job.status);
    let duration = estimated_duration(&job.start_date, &job.end_date);
    view! {
        <TableRow>
            <TableCell>{job.job_type.display_name()}</TableCell>
            <TableCell>{job.description}</TableCell>
            <TableCell>{format_date(&job.start_date)}</TableCell>
            <TableCell>{duration}</TableCell>
            <TableCell><StatusBadge status=status/></TableCell>
        </TableRow>
    }
}
