use contracts::domain::a001_maintenance_job::EmployeeAssigned;
use contracts::domain::a002_vehicle::Vehicle;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use super::job_form::{JobForm, JobFormState};
use super::live_jobs::use_live_jobs;
use super::work_table::WorkTable;
use crate::domain::a001_maintenance_job::api::fetch_employees;
use crate::domain::a001_maintenance_job::reconciler::JobSource;
use crate::domain::a002_vehicle::api::fetch_vehicles;
use crate::layout::global_context::AppGlobalContext;
use crate::shared::components::page_header::PageHeader;
use crate::system::auth::context::use_services;

/// Admin view of every job in the workshop, with create/edit/delete
#[component]
pub fn AllJobs() -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let services = StoredValue::new_local(use_services());
    let jobs = use_live_jobs(JobSource::All);
    let form = JobFormState::new();
    let saving = RwSignal::new(false);
    let vehicles = RwSignal::new(Vec::<Vehicle>::new());
    let employees = RwSignal::new(Vec::<EmployeeAssigned>::new());

    // Choices for the form selects
    let client = services.get_value().api;
    spawn_local(async move {
        match fetch_vehicles(&client).await {
            Ok(items) => vehicles.set(items),
            Err(e) => ctx.show_error(&e),
        }
        match fetch_employees(&client).await {
            Ok(items) => employees.set(items),
            Err(e) => log::warn!("[jobs] employees unavailable: {}", e),
        }
    });

    let save = Callback::new(move |_: ()| {
        let dto = match form.to_dto() {
            Ok(dto) => dto,
            Err(message) => {
                ctx.show_message(&message);
                return;
            }
        };
        saving.set(true);
        // a rejected save keeps the form filled
        let settled = move |accepted: bool| {
            saving.set(false);
            if accepted {
                form.reset();
            }
        };
        match form.editing.get_untracked() {
            Some(id) => jobs.update(id, dto, settled),
            None => jobs.create(dto, settled),
        }
    });

    let on_edit = Callback::new(move |id: i64| {
        if let Some(job) = jobs.snapshot(id) {
            form.load(&job);
        }
    });
    let on_delete = Callback::new(move |id: i64| {
        if form.editing.get_untracked() == Some(id) {
            form.reset();
        }
        jobs.delete(id);
    });

    view! {
        <div class="page">
            <PageHeader
                title="Trabajos del taller"
                subtitle="Actualizado en tiempo real"
                loading=jobs.loading
            >
                <Button on_click=move |_| jobs.reload()>"Actualizar"</Button>
            </PageHeader>

            <JobForm
                state=form
                vehicles=vehicles
                employees=employees
                saving=saving
                on_submit=save
            />

            <WorkTable
                items=Signal::derive(move || jobs.active())
                show_assignee=true
                on_edit=on_edit
                on_delete=on_delete
            />

            <h2>"Finalizados"</h2>
            <WorkTable
                items=Signal::derive(move || jobs.history())
                show_assignee=true
                on_delete=on_delete
            />
        </div>
    }
}
