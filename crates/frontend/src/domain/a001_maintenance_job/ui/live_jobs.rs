use std::rc::Rc;

use contracts::domain::a001_maintenance_job::{CreateJobDto, JobSnapshot};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::domain::a001_maintenance_job::api::HttpJobsApi;
use crate::domain::a001_maintenance_job::reconciler::{JobReconciler, JobSource, LocalJobList, Spawner};
use crate::domain::a001_maintenance_job::view_model::WorkItem;
use crate::layout::global_context::AppGlobalContext;
use crate::system::auth::context::{current_session, use_services};

/// Reactive handle on a reconciler owned by the calling component
#[derive(Clone, Copy)]
pub struct LiveJobs {
    pub list: RwSignal<LocalJobList>,
    pub loading: RwSignal<bool>,
    reconciler: StoredValue<JobReconciler, LocalStorage>,
    ctx: AppGlobalContext,
}

/// Wire a reconciler for `source` to the session channel.
///
/// The subscription lives as long as the calling component; unmounting it
/// unsubscribes and discards in-flight loads.
pub fn use_live_jobs(source: JobSource) -> LiveJobs {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let services = use_services();
    let list = RwSignal::new(LocalJobList::default());
    let loading = RwSignal::new(true);

    let reconciler = JobReconciler::new(Rc::new(HttpJobsApi::new(services.api.clone())), source);
    reconciler.set_on_change(move |jobs| {
        list.set(jobs.clone());
        loading.set(false);
    });
    reconciler.set_on_error(move |e| {
        loading.set(false);
        ctx.show_error(e);
    });

    let spawner: Spawner = Rc::new(|future| spawn_local(future));
    let user_id = current_session().map(|session| session.user_id());
    let wiring = reconciler.connect(user_id, services.channel(), spawner);
    if !wiring.is_loading() {
        loading.set(false);
    }
    // Dropped together with the owning component
    let _wiring = StoredValue::new_local(wiring);

    LiveJobs {
        list,
        loading,
        reconciler: StoredValue::new_local(reconciler),
        ctx,
    }
}

impl LiveJobs {
    pub fn active(&self) -> Vec<WorkItem> {
        self.list.with(|jobs| jobs.active())
    }

    pub fn history(&self) -> Vec<WorkItem> {
        self.list.with(|jobs| jobs.history())
    }

    pub fn reload(&self) {
        let Some(reconciler) = self.reconciler.try_get_value() else {
            return;
        };
        self.loading.set(true);
        spawn_local(async move {
            let _ = reconciler.load().await;
        });
    }

    pub fn start(&self, id: i64) {
        let Some(reconciler) = self.reconciler.try_get_value() else {
            return;
        };
        let ctx = self.ctx;
        spawn_local(async move {
            match reconciler.start(id).await {
                Ok(()) => ctx.show_success("Trabajo iniciado"),
                Err(e) => ctx.show_error(&e),
            }
        });
    }

    pub fn finish(&self, id: i64) {
        let Some(reconciler) = self.reconciler.try_get_value() else {
            return;
        };
        let ctx = self.ctx;
        spawn_local(async move {
            match reconciler.finish(id).await {
                Ok(()) => ctx.show_success("Trabajo finalizado"),
                Err(e) => ctx.show_error(&e),
            }
        });
    }

    /// Admin: create a job. `settled` gets whether the server accepted it.
    pub fn create(&self, dto: CreateJobDto, settled: impl FnOnce(bool) + 'static) {
        let Some(reconciler) = self.reconciler.try_get_value() else {
            return;
        };
        let ctx = self.ctx;
        spawn_local(async move {
            match reconciler.create(&dto).await {
                Ok(()) => {
                    ctx.show_success("Trabajo creado");
                    settled(true);
                }
                Err(e) => {
                    ctx.show_error(&e);
                    settled(false);
                }
            }
        });
    }

    pub fn update(&self, id: i64, dto: CreateJobDto, settled: impl FnOnce(bool) + 'static) {
        let Some(reconciler) = self.reconciler.try_get_value() else {
            return;
        };
        let ctx = self.ctx;
        spawn_local(async move {
            match reconciler.update(id, &dto).await {
                Ok(()) => {
                    ctx.show_success("Trabajo actualizado");
                    settled(true);
                }
                Err(e) => {
                    ctx.show_error(&e);
                    settled(false);
                }
            }
        });
    }

    pub fn delete(&self, id: i64) {
        let Some(reconciler) = self.reconciler.try_get_value() else {
            return;
        };
        let ctx = self.ctx;
        spawn_local(async move {
            match reconciler.delete(id).await {
                Ok(()) => ctx.show_success("Trabajo eliminado"),
                Err(e) => ctx.show_error(&e),
            }
        });
    }

    /// Raw snapshot behind a row, for edit forms
    pub fn snapshot(&self, id: i64) -> Option<JobSnapshot> {
        self.list.with_untracked(|jobs| jobs.get(id).cloned())
    }
}
