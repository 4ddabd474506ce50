use contracts::domain::a002_vehicle::{CreateVehicleDto, Vehicle};
use leptos::prelude::*;
use thaw::*;

/// Form state of the vehicle editor
///
/// Inputs are strings; numbers are parsed on submit.
#[derive(Clone, Copy)]
pub struct VehicleFormState {
    pub editing: RwSignal<Option<i64>>,
    pub client_id: RwSignal<String>,
    pub brand: RwSignal<String>,
    pub model: RwSignal<String>,
    pub year: RwSignal<String>,
    pub license_plate: RwSignal<String>,
    pub description: RwSignal<String>,
}

impl VehicleFormState {
    pub fn new() -> Self {
        Self {
            editing: RwSignal::new(None),
            client_id: RwSignal::new(String::new()),
            brand: RwSignal::new(String::new()),
            model: RwSignal::new(String::new()),
            year: RwSignal::new(String::new()),
            license_plate: RwSignal::new(String::new()),
            description: RwSignal::new(String::new()),
        }
    }

    pub fn reset(&self) {
        self.editing.set(None);
        for field in [
            self.client_id,
            self.brand,
            self.model,
            self.year,
            self.license_plate,
            self.description,
        ] {
            field.set(String::new());
        }
    }

    pub fn load(&self, vehicle: &Vehicle) {
        self.editing.set(Some(vehicle.id));
        self.client_id
            .set(vehicle.owner_id().map(|id| id.to_string()).unwrap_or_default());
        self.brand.set(vehicle.brand.clone());
        self.model.set(vehicle.model.clone());
        self.year.set(vehicle.year.to_string());
        self.license_plate.set(vehicle.license_plate.clone());
        self.description.set(vehicle.description.clone());
    }

    /// Validated DTO or the first problem found
    pub fn to_dto(&self) -> Result<CreateVehicleDto, String> {
        build_dto(
            &self.client_id.get_untracked(),
            &self.brand.get_untracked(),
            &self.model.get_untracked(),
            &self.year.get_untracked(),
            &self.license_plate.get_untracked(),
            &self.description.get_untracked(),
        )
    }
}

fn build_dto(
    client_id: &str,
    brand: &str,
    model: &str,
    year: &str,
    license_plate: &str,
    description: &str,
) -> Result<CreateVehicleDto, String> {
    let client_id = client_id
        .trim()
        .parse::<i64>()
        .map_err(|_| "El cliente no es válido".to_string())?;
    let year = year
        .trim()
        .parse::<i32>()
        .map_err(|_| "El año no es válido".to_string())?;
    let dto = CreateVehicleDto {
        client_id,
        brand: brand.trim().to_string(),
        model: model.trim().to_string(),
        year,
        license_plate: license_plate.trim().to_uppercase(),
        description: description.trim().to_string(),
    };
    dto.validate()?;
    Ok(dto)
}

#[component]
pub fn VehicleForm(
    state: VehicleFormState,
    #[prop(into)] saving: Signal<bool>,
    on_submit: Callback<()>,
) -> impl IntoView {
    view! {
        <Card>
            <Flex vertical=true gap=FlexGap::Medium>
                <h3>{move || if state.editing.get().is_some() { "Editar vehículo" } else { "Nuevo vehículo" }}</h3>
                <Flex gap=FlexGap::Medium>
                    <Input value=state.client_id placeholder="ID del cliente" input_type=InputType::Number/>
                    <Input value=state.brand placeholder="Marca"/>
                    <Input value=state.model placeholder="Modelo"/>
                </Flex>
                <Flex gap=FlexGap::Medium>
                    <Input value=state.year placeholder="Año" input_type=InputType::Number/>
                    <Input value=state.license_plate placeholder="Placa"/>
                    <Input value=state.description placeholder="Descripción"/>
                </Flex>
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
    fn test_build_dto_normalizes_input() {
        let dto = build_dto(" 3 ", " Ford ", "Fiesta", "2018", "abc-123", "").unwrap();
        assert_eq!(dto.client_id, 3);
        assert_eq!(dto.brand, "Ford");
        assert_eq!(dto.license_plate, "ABC-123");
    }

    #[test]
    fn test_build_dto_rejects_bad_numbers() {
        assert_eq!(
            build_dto("x", "Ford", "Ka", "2018", "A-1", "").unwrap_err(),
            "El cliente no es válido"
        );
        assert_eq!(
            build_dto("1", "Ford", "Ka", "dos mil", "A-1", "").unwrap_err(),
            "El año no es válido"
        );
        assert_eq!(
            build_dto("1", "", "Ka", "2018", "A-1", "").unwrap_err(),
            "La marca es obligatoria"
        );
    }
}
