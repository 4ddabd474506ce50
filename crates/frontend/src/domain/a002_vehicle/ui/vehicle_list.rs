use contracts::domain::a002_vehicle::Vehicle;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use super::vehicle_form::{VehicleForm, VehicleFormState};
use crate::domain::a002_vehicle::api::{create_vehicle, delete_vehicle, fetch_vehicles, update_vehicle};
use crate::layout::global_context::AppGlobalContext;
use crate::shared::components::page_header::PageHeader;
use crate::system::auth::context::use_services;

/// Admin view of the registered vehicles
#[component]
pub fn VehicleList() -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let services = StoredValue::new_local(use_services());
    let vehicles = RwSignal::new(Vec::<Vehicle>::new());
    let loading = RwSignal::new(false);
    let saving = RwSignal::new(false);
    let form = VehicleFormState::new();

    let fetch = move || {
        let client = services.get_value().api;
        loading.set(true);
        spawn_local(async move {
            match fetch_vehicles(&client).await {
                Ok(items) => vehicles.set(items),
                Err(e) => ctx.show_error(&e),
            }
            loading.set(false);
        });
    };

    let save = Callback::new(move |_: ()| {
        let dto = match form.to_dto() {
            Ok(dto) => dto,
            Err(message) => {
                ctx.show_message(&message);
                return;
            }
        };
        let client = services.get_value().api;
        let editing = form.editing.get_untracked();
        saving.set(true);
        spawn_local(async move {
            let result = match editing {
                Some(id) => update_vehicle(&client, id, &dto).await,
                None => create_vehicle(&client, &dto).await.map(|_| ()),
            };
            saving.set(false);
            match result {
                Ok(()) => {
                    ctx.show_success("Vehículo guardado");
                    form.reset();
                    fetch();
                }
                Err(e) => ctx.show_error(&e),
            }
        });
    });

    let remove = move |id: i64| {
        let client = services.get_value().api;
        spawn_local(async move {
            match delete_vehicle(&client, id).await {
                Ok(()) => {
                    ctx.show_success("Vehículo eliminado");
                    vehicles.update(|list| list.retain(|v| v.id != id));
                }
                Err(e) => ctx.show_error(&e),
            }
        });
    };

    fetch();

    view! {
        <div class="page">
            <PageHeader title="Vehículos" loading=loading>
                <Button on_click=move |_| fetch()>"Actualizar"</Button>
            </PageHeader>

            <VehicleForm state=form saving=saving on_submit=save/>

            <Table>
                <TableHeader>
                    <TableRow>
                        <TableHeaderCell>"Placa"</TableHeaderCell>
                        <TableHeaderCell>"Marca"</TableHeaderCell>
                        <TableHeaderCell>"Modelo"</TableHeaderCell>
                        <TableHeaderCell>"Año"</TableHeaderCell>
                        <TableHeaderCell>"Cliente"</TableHeaderCell>
                        <TableHeaderCell>""</TableHeaderCell>
                    </TableRow>
                </TableHeader>
                <TableBody>
                    {move || vehicles.get().into_iter().map(|vehicle| {
                        let id = vehicle.id;
                        let owner = vehicle
                            .client
                            .as_ref()
                            .map(|c| c.full_name())
                            .or_else(|| vehicle.owner_id().map(|id| format!("#{}", id)))
                            .unwrap_or_else(|| "-".to_string());
                        let for_edit = vehicle.clone();
                        view! {
                            <TableRow>
                                <TableCell>{vehicle.license_plate}</TableCell>
                                <TableCell>{vehicle.brand}</TableCell>
                                <TableCell>{vehicle.model}</TableCell>
                                <TableCell>{vehicle.year}</TableCell>
                                <TableCell>{owner}</TableCell>
                                <TableCell>
                                    <Flex gap=FlexGap::Small>
                                        <Button size=ButtonSize::Small on_click=move |_| form.load(&for_edit)>
                                            "Editar"
                                        </Button>
                                        <Button size=ButtonSize::Small on_click=move |_| remove(id)>
                                            "Eliminar"
                                        </Button>
                                    </Flex>
                                </TableCell>
                            </TableRow>
                        }
                    }).collect_view()}
                </TableBody>
            </Table>
        </div>
    }
}
