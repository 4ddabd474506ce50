//! Local job list kept in sync with the server.
//!
//! A REST snapshot seeds the list, realtime [`JobEvent`]s are folded into it
//! one at a time. `active()` and `history()` are always derived from the same
//! list, never stored.

use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

use async_trait::async_trait;
use contracts::domain::a001_maintenance_job::{
    CreateJobDto, JobAction, JobEvent, JobSnapshot, JobStatus,
};

use super::view_model::{WorkItem, WorkStatus};
use crate::shared::error::AppError;
use crate::shared::realtime::{JobChannel, ReconnectListener, Subscription, Topic};

/// Which jobs a reconciler tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobSource {
    /// Jobs assigned to the signed-in employee
    Mine,
    /// Every job in the workshop
    All,
}

impl JobSource {
    pub fn path(&self) -> &'static str {
        match self {
            JobSource::Mine => "/jobs/me",
            JobSource::All => "/jobs",
        }
    }

    pub fn topic(&self, user_id: i64) -> Topic {
        match self {
            JobSource::Mine => Topic::user_jobs(user_id),
            JobSource::All => Topic::jobs_broadcast(),
        }
    }
}

#[async_trait(?Send)]
pub trait JobsApi {
    async fn fetch_jobs(&self, source: JobSource) -> Result<Vec<JobSnapshot>, AppError>;
    async fn change_status(&self, id: i64, status: JobStatus) -> Result<JobSnapshot, AppError>;
    async fn create_job(&self, dto: &CreateJobDto) -> Result<JobSnapshot, AppError>;
    async fn update_job(&self, id: i64, dto: &CreateJobDto) -> Result<JobSnapshot, AppError>;
    async fn delete_job(&self, id: i64) -> Result<(), AppError>;
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocalJobList {
    jobs: Vec<JobSnapshot>,
}

impl LocalJobList {
    pub fn jobs(&self) -> &[JobSnapshot] {
        &self.jobs
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn get(&self, id: i64) -> Option<&JobSnapshot> {
        self.jobs.iter().find(|j| j.id == id)
    }

    fn position(&self, id: i64) -> Option<usize> {
        self.jobs.iter().position(|j| j.id == id)
    }

    /// Replace everything with a snapshot. Repeated ids keep the first
    /// position and the last value.
    pub fn replace_all(&mut self, snapshot: Vec<JobSnapshot>) {
        self.jobs.clear();
        for job in snapshot {
            self.upsert(job);
        }
    }

    fn upsert(&mut self, job: JobSnapshot) -> bool {
        match self.position(job.id) {
            Some(pos) if self.jobs[pos] == job => false,
            Some(pos) => {
                self.jobs[pos] = job;
                true
            }
            None => {
                self.jobs.push(job);
                true
            }
        }
    }

    /// Fold one event in; returns whether the list changed
    pub fn apply(&mut self, event: JobEvent) -> bool {
        match event.action {
            JobAction::Created => {
                if self.position(event.job.id).is_some() {
                    return false;
                }
                self.jobs.push(event.job);
                true
            }
            JobAction::Updated => self.upsert(event.job),
            JobAction::Deleted => match self.position(event.job.id) {
                Some(pos) => {
                    self.jobs.remove(pos);
                    true
                }
                None => false,
            },
        }
    }

    fn items_where(&self, keep: impl Fn(WorkStatus) -> bool) -> Vec<WorkItem> {
        self.jobs
            .iter()
            .map(WorkItem::from_snapshot)
            .filter(|item| keep(item.status))
            .collect()
    }

    /// Works not yet finished
    pub fn active(&self) -> Vec<WorkItem> {
        self.items_where(|status| !status.is_terminal())
    }

    /// Finished works
    pub fn history(&self) -> Vec<WorkItem> {
        self.items_where(|status| status.is_terminal())
    }
}

/// Runs a detached future (leptos `spawn_local` in the browser)
pub type Spawner = Rc<dyn Fn(Pin<Box<dyn Future<Output = ()>>>)>;

type ListObserver = Rc<dyn Fn(&LocalJobList)>;
type ErrorObserver = Rc<dyn Fn(&AppError)>;

struct ReconcilerState {
    list: LocalJobList,
    alive: bool,
    load_seq: u64,
    loading: bool,
    // Events seen while a snapshot is in flight, replayed on top of it
    pending: Vec<JobEvent>,
    on_change: Option<ListObserver>,
    on_error: Option<ErrorObserver>,
}

#[derive(Clone)]
pub struct JobReconciler {
    api: Rc<dyn JobsApi>,
    source: JobSource,
    state: Rc<RefCell<ReconcilerState>>,
}

impl JobReconciler {
    pub fn new(api: Rc<dyn JobsApi>, source: JobSource) -> Self {
        Self {
            api,
            source,
            state: Rc::new(RefCell::new(ReconcilerState {
                list: LocalJobList::default(),
                alive: true,
                load_seq: 0,
                loading: false,
                pending: Vec::new(),
                on_change: None,
                on_error: None,
            })),
        }
    }

    pub fn source(&self) -> JobSource {
        self.source
    }

    pub fn list(&self) -> LocalJobList {
        self.state.borrow().list.clone()
    }

    pub fn active(&self) -> Vec<WorkItem> {
        self.state.borrow().list.active()
    }

    pub fn history(&self) -> Vec<WorkItem> {
        self.state.borrow().list.history()
    }

    pub fn is_alive(&self) -> bool {
        self.state.borrow().alive
    }

    pub fn set_on_change(&self, observer: impl Fn(&LocalJobList) + 'static) {
        self.state.borrow_mut().on_change = Some(Rc::new(observer));
    }

    pub fn set_on_error(&self, observer: impl Fn(&AppError) + 'static) {
        self.state.borrow_mut().on_error = Some(Rc::new(observer));
    }

    fn notify_change(&self) {
        let (observer, list) = {
            let state = self.state.borrow();
            (state.on_change.clone(), state.list.clone())
        };
        if let Some(observer) = observer {
            observer(&list);
        }
    }

    fn report(&self, error: &AppError) {
        let observer = self.state.borrow().on_error.clone();
        if let Some(observer) = observer {
            observer(error);
        }
    }

    /// Fetch the snapshot and replace the list with it.
    ///
    /// On failure the last list stays in place. Results of a superseded
    /// load, or arriving after `dispose`, are dropped.
    pub async fn load(&self) -> Result<(), AppError> {
        let seq = {
            let mut state = self.state.borrow_mut();
            if !state.alive {
                return Ok(());
            }
            state.load_seq += 1;
            if !state.loading {
                state.loading = true;
                state.pending.clear();
            }
            state.load_seq
        };

        let result = self.api.fetch_jobs(self.source).await;

        {
            let mut state = self.state.borrow_mut();
            if !state.alive || state.load_seq != seq {
                log::debug!("[jobs] discarding stale {} snapshot", self.source.path());
                return Ok(());
            }
            state.loading = false;
            let pending = std::mem::take(&mut state.pending);
            match result {
                Ok(snapshot) => {
                    state.list.replace_all(snapshot);
                    for event in pending {
                        state.list.apply(event);
                    }
                    log::debug!("[jobs] {} loaded, {} job(s)", self.source.path(), state.list.len());
                }
                Err(e) => {
                    drop(state);
                    log::warn!("[jobs] load {} failed: {}", self.source.path(), e);
                    self.report(&e);
                    return Err(e);
                }
            }
        }
        self.notify_change();
        Ok(())
    }

    pub fn on_event(&self, event: JobEvent) {
        let changed = {
            let mut state = self.state.borrow_mut();
            if !state.alive {
                return;
            }
            if state.loading {
                state.pending.push(event.clone());
            }
            state.list.apply(event)
        };
        if changed {
            self.notify_change();
        }
    }

    /// PENDING -> INPROGRESS
    pub async fn start(&self, id: i64) -> Result<(), AppError> {
        self.change_status(id, JobStatus::InProgress).await
    }

    /// INPROGRESS -> COMPLETED
    pub async fn finish(&self, id: i64) -> Result<(), AppError> {
        self.change_status(id, JobStatus::Completed).await
    }

    async fn change_status(&self, id: i64, status: JobStatus) -> Result<(), AppError> {
        log::info!("[jobs] job {} -> {}", id, status.code());
        match self.api.change_status(id, status).await {
            // Same fold as the push that follows, so the push is a no-op
            Ok(job) => {
                self.on_event(JobEvent::updated(job));
                Ok(())
            }
            Err(e) => {
                log::warn!("[jobs] status change of {} failed: {}", id, e);
                Err(e)
            }
        }
    }

    /// The server echoes these as pushes too; folding the REST answer first
    /// makes the later push a no-op.
    pub async fn create(&self, dto: &CreateJobDto) -> Result<(), AppError> {
        let job = self.api.create_job(dto).await.map_err(|e| {
            log::warn!("[jobs] create failed: {}", e);
            e
        })?;
        log::info!("[jobs] job {} created", job.id);
        self.on_event(JobEvent::created(job));
        Ok(())
    }

    pub async fn update(&self, id: i64, dto: &CreateJobDto) -> Result<(), AppError> {
        let job = self.api.update_job(id, dto).await.map_err(|e| {
            log::warn!("[jobs] update of {} failed: {}", id, e);
            e
        })?;
        self.on_event(JobEvent::updated(job));
        Ok(())
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        self.api.delete_job(id).await.map_err(|e| {
            log::warn!("[jobs] delete of {} failed: {}", id, e);
            e
        })?;
        log::info!("[jobs] job {} deleted", id);
        let known = self.state.borrow().list.get(id).cloned();
        if let Some(job) = known {
            self.on_event(JobEvent::deleted(job));
        }
        Ok(())
    }

    /// Stop applying anything; pending REST results are discarded
    pub fn dispose(&self) {
        let mut state = self.state.borrow_mut();
        state.alive = false;
        state.on_change = None;
        state.on_error = None;
        state.pending.clear();
    }

    /// Subscribe to `topic`, then load. Every reconnection forces a new load
    /// since events sent while offline are lost.
    pub fn attach(
        &self,
        channel: &JobChannel,
        topic: Topic,
        spawner: Spawner,
    ) -> Result<ReconcilerAttachment, AppError> {
        let target = self.clone();
        let subscription = channel.subscribe_jobs(topic, move |event| target.on_event(event))?;

        let target = self.clone();
        let reload_spawner = spawner.clone();
        let reconnect = channel.on_reconnect(move || {
            let target = target.clone();
            reload_spawner(Box::pin(async move {
                let _ = target.load().await;
            }));
        });

        let target = self.clone();
        spawner(Box::pin(async move {
            let _ = target.load().await;
        }));

        Ok(ReconcilerAttachment {
            reconciler: self.clone(),
            _subscription: subscription,
            _reconnect: reconnect,
        })
    }

    /// Wire the reconciler for whoever is signed in. Without a session there
    /// is nothing to load; with an inactive channel a single snapshot is
    /// loaded and no live updates follow.
    pub fn connect(&self, user_id: Option<i64>, channel: &JobChannel, spawner: Spawner) -> Wiring {
        let Some(user_id) = user_id else {
            log::debug!("[jobs] no session, {} stays idle", self.source.path());
            return Wiring::Idle;
        };
        match self.attach(channel, self.source.topic(user_id), spawner.clone()) {
            Ok(attachment) => Wiring::Live(attachment),
            Err(e) => {
                log::warn!("[jobs] live updates unavailable: {}", e);
                let target = self.clone();
                spawner(Box::pin(async move {
                    let _ = target.load().await;
                }));
                Wiring::Snapshot
            }
        }
    }
}

pub enum Wiring {
    Live(ReconcilerAttachment),
    Snapshot,
    Idle,
}

impl Wiring {
    /// Whether a load was started
    pub fn is_loading(&self) -> bool {
        !matches!(self, Wiring::Idle)
    }
}

/// Keeps a reconciler wired to the channel; dropping it unsubscribes and
/// disposes the reconciler.
pub struct ReconcilerAttachment {
    reconciler: JobReconciler,
    _subscription: Subscription,
    _reconnect: ReconnectListener,
}

impl ReconcilerAttachment {
    pub fn reconciler(&self) -> &JobReconciler {
        &self.reconciler
    }
}

impl Drop for ReconcilerAttachment {
    fn drop(&mut self) {
        self.reconciler.dispose();
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::shared::realtime::channel::tests::{channel, drain, open};
    use crate::shared::realtime::stomp::Command;
    use contracts::domain::a001_maintenance_job::JobType;
    use contracts::domain::a002_vehicle::Vehicle;
    use futures_channel::oneshot;
    use futures_executor::{block_on, LocalPool};
    use futures_util::task::LocalSpawnExt;
    use proptest::prelude::*;
    use std::cell::Cell;
    use std::collections::{BTreeMap, VecDeque};

    pub(crate) fn job(id: i64, status: &str) -> JobSnapshot {
        JobSnapshot {
            id,
            vehicle: Vehicle {
                id,
                brand: "Toyota".into(),
                model: "Corolla".into(),
                year: 2019,
                license_plate: format!("ABC-{:03}", id),
                ..Vehicle::default()
            },
            employee_assigned: None,
            description: format!("job {}", id),
            start_date: "2025-01-01T08:00:00".into(),
            end_date: "2025-01-01T10:30:00".into(),
            status: JobStatus::from_code(status),
            job_type: JobType::Corrective,
            created_at: None,
            created_by: None,
        }
    }

    fn ids(list: &LocalJobList) -> Vec<i64> {
        list.jobs().iter().map(|j| j.id).collect()
    }

    /// Serves queued snapshots; a snapshot may be gated on a oneshot
    #[derive(Default)]
    struct FakeJobsApi {
        snapshots: RefCell<VecDeque<Result<Vec<JobSnapshot>, AppError>>>,
        gate: RefCell<Option<oneshot::Receiver<()>>>,
        fetches: Cell<u32>,
        next_id: Cell<i64>,
        reject_deletes: Cell<bool>,
    }

    impl FakeJobsApi {
        fn serving(snapshot: Vec<JobSnapshot>) -> Rc<Self> {
            let api = Rc::new(Self::default());
            api.snapshots.borrow_mut().push_back(Ok(snapshot));
            api
        }
    }

    #[async_trait(?Send)]
    impl JobsApi for FakeJobsApi {
        async fn fetch_jobs(&self, _source: JobSource) -> Result<Vec<JobSnapshot>, AppError> {
            self.fetches.set(self.fetches.get() + 1);
            let gate = self.gate.borrow_mut().take();
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            self.snapshots
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Ok(Vec::new()))
        }

        async fn change_status(&self, id: i64, status: JobStatus) -> Result<JobSnapshot, AppError> {
            Ok(job(id, status.code()))
        }

        async fn create_job(&self, dto: &CreateJobDto) -> Result<JobSnapshot, AppError> {
            let id = self.next_id.get().max(100);
            self.next_id.set(id + 1);
            let mut created = job(id, "PENDING");
            created.description = dto.description.clone();
            Ok(created)
        }

        async fn update_job(&self, id: i64, dto: &CreateJobDto) -> Result<JobSnapshot, AppError> {
            let mut updated = job(id, "PENDING");
            updated.description = dto.description.clone();
            updated.job_type = dto.job_type;
            Ok(updated)
        }

        async fn delete_job(&self, id: i64) -> Result<(), AppError> {
            if self.reject_deletes.get() {
                return Err(AppError::fetch(&format!("DELETE /jobs/{}", id), "HTTP 409"));
            }
            Ok(())
        }
    }

    fn draft(description: &str) -> CreateJobDto {
        CreateJobDto {
            vehicle_id: 1,
            employee_assigned_id: 2,
            description: description.into(),
            start_date: "2025-03-01T08:00".into(),
            end_date: "2025-03-01T10:00".into(),
            job_type: JobType::Preventive,
        }
    }

    #[test]
    fn test_events_behave_as_last_writer_wins_log() {
        let mut list = LocalJobList::default();
        list.apply(JobEvent::created(job(1, "PENDING")));
        list.apply(JobEvent::created(job(2, "PENDING")));
        list.apply(JobEvent::updated(job(1, "INPROGRESS")));
        list.apply(JobEvent::updated(job(3, "PENDING")));
        list.apply(JobEvent::deleted(job(2, "PENDING")));
        list.apply(JobEvent::created(job(1, "PENDING")));

        assert_eq!(ids(&list), vec![1, 3]);
        assert_eq!(list.get(1).unwrap().status, JobStatus::InProgress);
    }

    fn arb_event() -> impl Strategy<Value = JobEvent> {
        let status = prop::sample::select(vec!["PENDING", "INPROGRESS", "COMPLETED"]);
        (0u8..3, 1i64..6, status).prop_map(|(action, id, status)| {
            let snapshot = job(id, status);
            match action {
                0 => JobEvent::created(snapshot),
                1 => JobEvent::updated(snapshot),
                _ => JobEvent::deleted(snapshot),
            }
        })
    }

    /// Keyed last-writer-wins fold; `created` never overwrites
    fn fold_model(model: &mut BTreeMap<i64, JobSnapshot>, event: JobEvent) -> bool {
        let id = event.job.id;
        match event.action {
            JobAction::Created => {
                if model.contains_key(&id) {
                    return false;
                }
                model.insert(id, event.job);
                true
            }
            JobAction::Updated => model.insert(id, event.job.clone()).as_ref() != Some(&event.job),
            JobAction::Deleted => model.remove(&id).is_some(),
        }
    }

    proptest! {
        #[test]
        fn test_list_matches_keyed_model(events in prop::collection::vec(arb_event(), 0..40)) {
            let mut list = LocalJobList::default();
            let mut model = BTreeMap::new();
            for event in events {
                let changed = list.apply(event.clone());
                prop_assert_eq!(changed, fold_model(&mut model, event));
            }

            let by_id: BTreeMap<i64, JobSnapshot> =
                list.jobs().iter().map(|j| (j.id, j.clone())).collect();
            prop_assert_eq!(by_id.len(), list.len());
            prop_assert_eq!(by_id, model);
        }
    }

    #[test]
    fn test_duplicate_created_is_idempotent() {
        let mut once = LocalJobList::default();
        once.apply(JobEvent::created(job(2, "PENDING")));
        let mut twice = once.clone();
        assert!(!twice.apply(JobEvent::created(job(2, "PENDING"))));
        assert_eq!(once, twice);
        assert_eq!(twice.len(), 1);
    }

    #[test]
    fn test_delete_of_absent_id_is_noop() {
        let mut list = LocalJobList::default();
        list.apply(JobEvent::created(job(1, "PENDING")));
        let before = list.clone();
        assert!(!list.apply(JobEvent::deleted(job(9, "PENDING"))));
        assert_eq!(list, before);
    }

    #[test]
    fn test_update_keeps_position() {
        let mut list = LocalJobList::default();
        list.replace_all(vec![job(1, "PENDING"), job(2, "PENDING"), job(3, "PENDING")]);
        list.apply(JobEvent::updated(job(2, "COMPLETED")));
        assert_eq!(ids(&list), vec![1, 2, 3]);
    }

    #[test]
    fn test_snapshot_dedupes_ids() {
        let mut list = LocalJobList::default();
        list.replace_all(vec![job(1, "PENDING"), job(2, "PENDING"), job(1, "COMPLETED")]);
        assert_eq!(ids(&list), vec![1, 2]);
        assert_eq!(list.get(1).unwrap().status, JobStatus::Completed);
    }

    #[test]
    fn test_load_then_update_moves_work_in_progress() {
        let reconciler = JobReconciler::new(FakeJobsApi::serving(vec![job(1, "PENDING")]), JobSource::Mine);
        block_on(reconciler.load()).unwrap();
        reconciler.on_event(JobEvent::updated(job(1, "INPROGRESS")));

        let active = reconciler.active();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].status.label(), "En curso");
        assert!(reconciler.history().is_empty());
    }

    #[test]
    fn test_failed_load_keeps_last_known_list() {
        let api = FakeJobsApi::serving(vec![job(1, "PENDING")]);
        api.snapshots
            .borrow_mut()
            .push_back(Err(AppError::fetch("GET /jobs/me", "HTTP 500")));
        let reconciler = JobReconciler::new(api, JobSource::Mine);
        let errors = Rc::new(Cell::new(0));
        let counter = errors.clone();
        reconciler.set_on_error(move |_| counter.set(counter.get() + 1));

        block_on(reconciler.load()).unwrap();
        assert!(matches!(block_on(reconciler.load()), Err(AppError::FetchFailed(_))));
        assert_eq!(ids(&reconciler.list()), vec![1]);
        assert_eq!(errors.get(), 1);
    }

    #[test]
    fn test_results_after_dispose_are_discarded() {
        let api = FakeJobsApi::serving(vec![job(1, "PENDING")]);
        let (release, gate) = oneshot::channel();
        *api.gate.borrow_mut() = Some(gate);
        let reconciler = JobReconciler::new(api, JobSource::Mine);

        let mut pool = LocalPool::new();
        let loading = reconciler.clone();
        pool.spawner()
            .spawn_local(async move {
                let _ = loading.load().await;
            })
            .unwrap();
        pool.run_until_stalled();

        reconciler.dispose();
        release.send(()).unwrap();
        pool.run();

        assert!(reconciler.list().is_empty());
        reconciler.on_event(JobEvent::created(job(5, "PENDING")));
        assert!(reconciler.list().is_empty());
    }

    #[test]
    fn test_events_during_load_survive_snapshot() {
        let api = FakeJobsApi::serving(vec![job(1, "PENDING")]);
        let (release, gate) = oneshot::channel();
        *api.gate.borrow_mut() = Some(gate);
        let reconciler = JobReconciler::new(api, JobSource::All);

        let mut pool = LocalPool::new();
        let loading = reconciler.clone();
        pool.spawner()
            .spawn_local(async move {
                let _ = loading.load().await;
            })
            .unwrap();
        pool.run_until_stalled();

        reconciler.on_event(JobEvent::created(job(2, "PENDING")));
        release.send(()).unwrap();
        pool.run();

        assert_eq!(ids(&reconciler.list()), vec![1, 2]);
    }

    #[test]
    fn test_finish_then_late_push_is_single_transition() {
        let reconciler = JobReconciler::new(FakeJobsApi::serving(vec![job(4, "INPROGRESS")]), JobSource::Mine);
        block_on(reconciler.load()).unwrap();

        let changes = Rc::new(Cell::new(0));
        let counter = changes.clone();
        reconciler.set_on_change(move |_| counter.set(counter.get() + 1));

        block_on(reconciler.finish(4)).unwrap();
        reconciler.on_event(JobEvent::updated(job(4, "COMPLETED")));

        assert_eq!(changes.get(), 1);
        assert_eq!(reconciler.history().len(), 1);
        assert!(reconciler.active().is_empty());
    }

    #[test]
    fn test_create_then_echoed_push_adds_one_job() {
        let reconciler = JobReconciler::new(FakeJobsApi::serving(vec![job(1, "PENDING")]), JobSource::All);
        block_on(reconciler.load()).unwrap();

        block_on(reconciler.create(&draft("Alineación"))).unwrap();
        let created = reconciler.list().jobs()[1].clone();
        assert_eq!(created.description, "Alineación");

        reconciler.on_event(JobEvent::created(created));
        assert_eq!(reconciler.list().len(), 2);
    }

    #[test]
    fn test_update_replaces_in_place() {
        let reconciler = JobReconciler::new(
            FakeJobsApi::serving(vec![job(1, "PENDING"), job(2, "PENDING")]),
            JobSource::All,
        );
        block_on(reconciler.load()).unwrap();

        block_on(reconciler.update(1, &draft("Cambio de correa"))).unwrap();
        assert_eq!(ids(&reconciler.list()), vec![1, 2]);
        let updated = reconciler.list().get(1).cloned().unwrap();
        assert_eq!(updated.description, "Cambio de correa");
        assert_eq!(updated.job_type, JobType::Preventive);
    }

    #[test]
    fn test_delete_removes_only_after_server_accepts() {
        let api = FakeJobsApi::serving(vec![job(1, "PENDING"), job(2, "COMPLETED")]);
        let reconciler = JobReconciler::new(api.clone(), JobSource::All);
        block_on(reconciler.load()).unwrap();

        api.reject_deletes.set(true);
        assert!(block_on(reconciler.delete(2)).is_err());
        assert_eq!(ids(&reconciler.list()), vec![1, 2]);

        api.reject_deletes.set(false);
        block_on(reconciler.delete(2)).unwrap();
        assert_eq!(ids(&reconciler.list()), vec![1]);
        assert!(reconciler.history().is_empty());

        // the echoed push finds nothing left to remove
        reconciler.on_event(JobEvent::deleted(job(2, "COMPLETED")));
        assert_eq!(ids(&reconciler.list()), vec![1]);
    }

    fn pool_spawner(pool: &LocalPool) -> Spawner {
        let spawner = pool.spawner();
        Rc::new(move |future| {
            let _ = spawner.spawn_local(future);
        })
    }

    #[test]
    fn test_attach_loads_and_reloads_after_reconnect() {
        let (channel, connector) = channel();
        channel.activate("t");
        let link = connector.last();
        let mut rx = open(&link);

        let api = FakeJobsApi::serving(vec![job(1, "PENDING")]);
        api.snapshots.borrow_mut().push_back(Ok(vec![job(1, "COMPLETED"), job(2, "PENDING")]));
        let reconciler = JobReconciler::new(api.clone(), JobSource::Mine);

        let mut pool = LocalPool::new();
        let attachment = reconciler
            .attach(&channel, JobSource::Mine.topic(7), pool_spawner(&pool))
            .unwrap();
        pool.run();
        assert_eq!(api.fetches.get(), 1);
        assert_eq!(ids(&reconciler.list()), vec![1]);

        let sent = drain(&mut rx);
        let subscribe = sent.iter().find(|f| f.command == Command::Subscribe).unwrap();
        assert_eq!(subscribe.get("destination"), Some("/user/7/jobs"));

        link.detach();
        let _rx = open(&link);
        pool.run();
        assert_eq!(api.fetches.get(), 2);
        assert_eq!(reconciler.history().len(), 1);
        assert_eq!(reconciler.active().len(), 1);

        drop(attachment);
        assert!(!reconciler.is_alive());
        assert_eq!(channel.subscription_count(), 0);
    }

    #[test]
    fn test_connect_without_session_is_idle() {
        let (channel, _) = channel();
        channel.activate("t");
        let api = FakeJobsApi::serving(vec![job(1, "PENDING")]);
        let reconciler = JobReconciler::new(api.clone(), JobSource::Mine);
        let mut pool = LocalPool::new();

        let wiring = reconciler.connect(None, &channel, pool_spawner(&pool));
        pool.run();

        assert!(!wiring.is_loading());
        assert_eq!(api.fetches.get(), 0);
        assert_eq!(channel.subscription_count(), 0);
    }

    #[test]
    fn test_connect_on_inactive_channel_loads_snapshot_once() {
        let (channel, _) = channel();
        let api = FakeJobsApi::serving(vec![job(1, "PENDING")]);
        let reconciler = JobReconciler::new(api.clone(), JobSource::Mine);
        let mut pool = LocalPool::new();

        let wiring = reconciler.connect(Some(7), &channel, pool_spawner(&pool));
        pool.run();

        assert!(matches!(wiring, Wiring::Snapshot));
        assert_eq!(api.fetches.get(), 1);
        assert_eq!(ids(&reconciler.list()), vec![1]);
    }

    #[test]
    fn test_attach_requires_active_channel() {
        let (channel, _) = channel();
        let reconciler = JobReconciler::new(FakeJobsApi::serving(Vec::new()), JobSource::All);
        let pool = LocalPool::new();
        assert!(matches!(
            reconciler.attach(&channel, Topic::jobs_broadcast(), pool_spawner(&pool)),
            Err(AppError::NotActive)
        ));
    }
}
