use leptos::prelude::*;
use thaw::*;

use super::live_jobs::use_live_jobs;
use super::progress_form::ProgressForm;
use super::work_table::WorkTable;
use crate::domain::a001_maintenance_job::reconciler::JobSource;
use crate::domain::a003_job_advice::ui::SupportRequestForm;
use crate::shared::components::page_header::PageHeader;

/// Employee view: assigned jobs, live over the personal topic, with support
/// requests and progress reports
#[component]
pub fn MyJobs() -> impl IntoView {
    let jobs = use_live_jobs(JobSource::Mine);
    let support_for = RwSignal::new(None::<i64>);
    let progress_for = RwSignal::new(None::<i64>);

    let on_start = Callback::new(move |id: i64| jobs.start(id));
    let on_finish = Callback::new(move |id: i64| jobs.finish(id));
    let on_support = Callback::new(move |id: i64| {
        progress_for.set(None);
        support_for.set(Some(id));
    });
    let on_progress = Callback::new(move |id: i64| {
        support_for.set(None);
        progress_for.set(Some(id));
    });

    view! {
        <div class="page">
            <PageHeader title="Mis trabajos" loading=jobs.loading>
                <Button on_click=move |_| jobs.reload()>"Actualizar"</Button>
            </PageHeader>

            <WorkTable
                items=Signal::derive(move || jobs.active())
                on_start=on_start
                on_finish=on_finish
                on_support=on_support
                on_progress=on_progress
            />

            <SupportRequestForm job_id=support_for/>
            <ProgressForm job_id=progress_for/>

            <h2>"Historial"</h2>
            <WorkTable items=Signal::derive(move || jobs.history()) on_progress=on_progress/>
        </div>
    }
}
