use contracts::domain::a001_maintenance_job::{CreateJobDto, EmployeeAssigned, JobSnapshot, JobType};
use contracts::domain::a002_vehicle::Vehicle;
use leptos::prelude::*;
use thaw::*;

/// Form state of the admin job editor. Selects hold ids as strings.
#[derive(Clone, Copy)]
pub struct JobFormState {
    pub editing: RwSignal<Option<i64>>,
    pub vehicle_id: RwSignal<String>,
    pub employee_id: RwSignal<String>,
    pub description: RwSignal<String>,
    pub start_date: RwSignal<String>,
    pub end_date: RwSignal<String>,
    pub job_type: RwSignal<String>,
}

fn type_code(job_type: JobType) -> &'static str {
    match job_type {
        JobType::Corrective => "CORRECTIVE",
        JobType::Preventive => "PREVENTIVE",
    }
}

/// `datetime-local` inputs take minutes precision
fn to_input_date(raw: &str) -> String {
    raw.chars().take(16).collect()
}

impl JobFormState {
    pub fn new() -> Self {
        Self {
            editing: RwSignal::new(None),
            vehicle_id: RwSignal::new(String::new()),
            employee_id: RwSignal::new(String::new()),
            description: RwSignal::new(String::new()),
            start_date: RwSignal::new(String::new()),
            end_date: RwSignal::new(String::new()),
            job_type: RwSignal::new(type_code(JobType::Corrective).to_string()),
        }
    }

    pub fn reset(&self) {
        self.editing.set(None);
        for field in [
            self.vehicle_id,
            self.employee_id,
            self.description,
            self.start_date,
            self.end_date,
        ] {
            field.set(String::new());
        }
        self.job_type.set(type_code(JobType::Corrective).to_string());
    }

    pub fn load(&self, job: &JobSnapshot) {
        let dto = CreateJobDto::from_snapshot(job);
        self.editing.set(Some(job.id));
        self.vehicle_id.set(dto.vehicle_id.to_string());
        self.employee_id.set(if dto.employee_assigned_id > 0 {
            dto.employee_assigned_id.to_string()
        } else {
            String::new()
        });
        self.description.set(dto.description);
        self.start_date.set(to_input_date(&dto.start_date));
        self.end_date.set(to_input_date(&dto.end_date));
        self.job_type.set(type_code(dto.job_type).to_string());
    }

    pub fn to_dto(&self) -> Result<CreateJobDto, String> {
        build_dto(
            &self.vehicle_id.get_untracked(),
            &self.employee_id.get_untracked(),
            &self.description.get_untracked(),
            &self.start_date.get_untracked(),
            &self.end_date.get_untracked(),
            &self.job_type.get_untracked(),
        )
    }
}

fn build_dto(
    vehicle_id: &str,
    employee_id: &str,
    description: &str,
    start_date: &str,
    end_date: &str,
    job_type: &str,
) -> Result<CreateJobDto, String> {
    let vehicle_id = vehicle_id.trim().parse::<i64>().unwrap_or(0);
    let employee_assigned_id = employee_id.trim().parse::<i64>().unwrap_or(0);
    let job_type = match job_type {
        "PREVENTIVE" => JobType::Preventive,
        "CORRECTIVE" => JobType::Corrective,
        _ => return Err("Tipo de trabajo no válido".into()),
    };
    let dto = CreateJobDto {
        vehicle_id,
        employee_assigned_id,
        description: description.trim().to_string(),
        start_date: start_date.trim().to_string(),
        end_date: end_date.trim().to_string(),
        job_type,
    };
    dto.validate()?;
    Ok(dto)
}

#[component]
pub fn JobForm(
    state: JobFormState,
    #[prop(into)] vehicles: Signal<Vec<Vehicle>>,
    #[prop(into)] employees: Signal<Vec<EmployeeAssigned>>,
    #[prop(into)] saving: Signal<bool>,
    on_submit: Callback<()>,
) -> impl IntoView {
    view! {
        <Card>
            <Flex vertical=true gap=FlexGap::Medium>
                <h3>{move || if state.editing.get().is_some() { "Editar trabajo" } else { "Nuevo trabajo" }}</h3>
                <Flex gap=FlexGap::Medium>
                    <select
                        class="form-select"
                        on:change=move |ev| state.vehicle_id.set(event_target_value(&ev))
                        prop:value=move || state.vehicle_id.get()
                    >
                        <option value="">"Vehículo..."</option>
                        {move || vehicles.get().into_iter().map(|v| {
                            view! { <option value=v.id.to_string()>{v.label()}</option> }
                        }).collect_view()}
                    </select>
                    <select
                        class="form-select"
                        on:change=move |ev| state.employee_id.set(event_target_value(&ev))
                        prop:value=move || state.employee_id.get()
                    >
                        <option value="">"Empleado..."</option>
                        {move || employees.get().into_iter().map(|e| {
                            let label = match &e.specialization {
                                Some(spec) => format!("{} ({})", e.user.full_name(), spec.name),
                                None => e.user.full_name(),
                            };
                            view! { <option value=e.id.to_string()>{label}</option> }
                        }).collect_view()}
                    </select>
                    <select
                        class="form-select"
                        on:change=move |ev| state.job_type.set(event_target_value(&ev))
                        prop:value=move || state.job_type.get()
                    >
                        {[JobType::Corrective, JobType::Preventive].into_iter().map(|t| {
                            view! { <option value=type_code(t)>{t.display_name()}</option> }
                        }).collect_view()}
                    </select>
                </Flex>
                <Flex gap=FlexGap::Medium>
                    <input
                        type="datetime-local"
                        class="form-input"
                        prop:value=move || state.start_date.get()
                        on:input=move |ev| state.start_date.set(event_target_value(&ev))
                    />
                    <input
                        type="datetime-local"
                        class="form-input"
                        prop:value=move || state.end_date.get()
                        on:input=move |ev| state.end_date.set(event_target_value(&ev))
                    />
                </Flex>
                <Textarea value=state.description placeholder="Descripción del trabajo"/>
                <Flex gap=FlexGap::Small>
                    <Button
                        appearance=ButtonAppearance::Primary
                        disabled=saving
                        on_click=move |_| on_submit.run(())
                    >
                        "Guardar"
                    </Button>
                    <Button on_click=move |_| state.reset()>"Limpiar"</Button>
                </Flex>
            </Flex>
        </Card>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_dto_from_inputs() {
        let dto = build_dto(
            "3",
            "5",
            " Cambio de aceite ",
            "2025-02-01T08:00",
            "2025-02-01T09:00",
            "PREVENTIVE",
        )
        .unwrap();
        assert_eq!(dto.vehicle_id, 3);
        assert_eq!(dto.employee_assigned_id, 5);
        assert_eq!(dto.description, "Cambio de aceite");
        assert_eq!(dto.job_type, JobType::Preventive);
    }

    #[test]
    fn test_build_dto_requires_selections() {
        assert_eq!(
            build_dto("", "5", "x", "2025-02-01T08:00", "2025-02-01T09:00", "CORRECTIVE").unwrap_err(),
            "Seleccione un vehículo"
        );
        assert_eq!(
            build_dto("3", "", "x", "2025-02-01T08:00", "2025-02-01T09:00", "CORRECTIVE").unwrap_err(),
            "Seleccione un empleado"
        );
        assert!(build_dto("3", "5", "x", "2025-02-01T08:00", "2025-02-01T09:00", "OTHER").is_err());
    }

    #[test]
    fn test_server_dates_fit_datetime_inputs() {
        assert_eq!(to_input_date("2025-01-10T08:00:00"), "2025-01-10T08:00");
        assert_eq!(to_input_date("2025-01-10"), "2025-01-10");
    }
}
