use contracts::domain::a005_provider::{CreateProviderDto, Provider};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::domain::a005_provider::api::{
    create_provider, delete_provider, fetch_providers, update_provider,
};
use crate::layout::global_context::AppGlobalContext;
use crate::shared::components::page_header::PageHeader;
use crate::system::auth::context::use_services;

#[derive(Clone, Copy)]
struct ProviderFormState {
    editing: RwSignal<Option<i64>>,
    name: RwSignal<String>,
    contact_name: RwSignal<String>,
    email: RwSignal<String>,
    phone: RwSignal<String>,
    address: RwSignal<String>,
}

impl ProviderFormState {
    fn new() -> Self {
        Self {
            editing: RwSignal::new(None),
            name: RwSignal::new(String::new()),
            contact_name: RwSignal::new(String::new()),
            email: RwSignal::new(String::new()),
            phone: RwSignal::new(String::new()),
            address: RwSignal::new(String::new()),
        }
    }

    fn fields(&self) -> [RwSignal<String>; 5] {
        [self.name, self.contact_name, self.email, self.phone, self.address]
    }

    fn reset(&self) {
        self.editing.set(None);
        for field in self.fields() {
            field.set(String::new());
        }
    }

    fn load(&self, provider: &Provider) {
        let dto = CreateProviderDto::from_provider(provider);
        self.editing.set(Some(provider.id));
        self.name.set(dto.name);
        self.contact_name.set(dto.contact_name);
        self.email.set(dto.email);
        self.phone.set(dto.phone);
        self.address.set(dto.address);
    }

    fn to_dto(&self) -> Result<CreateProviderDto, String> {
        let [name, contact_name, email, phone, address] =
            self.fields().map(|f| f.get_untracked().trim().to_string());
        let dto = CreateProviderDto {
            name,
            contact_name,
            email: email.to_lowercase(),
            phone,
            address,
        };
        dto.validate()?;
        Ok(dto)
    }
}

/// Admin view of the parts providers
#[component]
pub fn ProviderList() -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let services = StoredValue::new_local(use_services());
    let providers = RwSignal::new(Vec::<Provider>::new());
    let loading = RwSignal::new(false);
    let saving = RwSignal::new(false);
    let form = ProviderFormState::new();

    let fetch = move || {
        let client = services.get_value().api;
        loading.set(true);
        spawn_local(async move {
            match fetch_providers(&client).await {
                Ok(items) => providers.set(items),
                Err(e) => ctx.show_error(&e),
            }
            loading.set(false);
        });
    };

    let save = move |_| {
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
                Some(id) => update_provider(&client, id, &dto).await,
                None => create_provider(&client, &dto).await,
            };
            saving.set(false);
            match result {
                Ok(()) => {
                    ctx.show_success("Proveedor guardado");
                    form.reset();
                    fetch();
                }
                Err(e) => ctx.show_error(&e),
            }
        });
    };

    let remove = move |id: i64| {
        let client = services.get_value().api;
        spawn_local(async move {
            match delete_provider(&client, id).await {
                Ok(()) => {
                    ctx.show_success("Proveedor eliminado");
                    providers.update(|list| list.retain(|p| p.id != id));
                }
                Err(e) => ctx.show_error(&e),
            }
        });
    };

    fetch();

    view! {
        <div class="page">
            <PageHeader title="Proveedores" loading=loading>
                <Button on_click=move |_| fetch()>"Actualizar"</Button>
            </PageHeader>

            <Card>
                <Flex vertical=true gap=FlexGap::Medium>
                    <h3>{move || if form.editing.get().is_some() { "Editar proveedor" } else { "Nuevo proveedor" }}</h3>
                    <Flex gap=FlexGap::Medium>
                        <Input value=form.name placeholder="Nombre"/>
                        <Input value=form.contact_name placeholder="Contacto"/>
                        <Input value=form.email placeholder="Correo"/>
                    </Flex>
                    <Flex gap=FlexGap::Medium>
                        <Input value=form.phone placeholder="Teléfono"/>
                        <Input value=form.address placeholder="Dirección"/>
                    </Flex>
                    <Flex gap=FlexGap::Small>
                        <Button appearance=ButtonAppearance::Primary disabled=saving on_click=save>
                            "Guardar"
                        </Button>
                        <Button on_click=move |_| form.reset()>"Limpiar"</Button>
                    </Flex>
                </Flex>
            </Card>

            <Table>
                <TableHeader>
                    <TableRow>
                        <TableHeaderCell>"Nombre"</TableHeaderCell>
                        <TableHeaderCell>"Contacto"</TableHeaderCell>
                        <TableHeaderCell>"Correo"</TableHeaderCell>
                        <TableHeaderCell>"Teléfono"</TableHeaderCell>
                        <TableHeaderCell>""</TableHeaderCell>
                    </TableRow>
                </TableHeader>
                <TableBody>
                    {move || providers.get().into_iter().map(|provider| {
                        let id = provider.id;
                        let for_edit = provider.clone();
                        view! {
                            <TableRow>
                                <TableCell>{provider.name}</TableCell>
                                <TableCell>{provider.contact_name}</TableCell>
                                <TableCell>{provider.email}</TableCell>
                                <TableCell>{provider.phone}</TableCell>
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
