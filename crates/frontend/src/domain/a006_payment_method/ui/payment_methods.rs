use contracts::domain::a006_payment_method::{PaymentMethod, PaymentMethodDto};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::domain::a006_payment_method::api::{
    create_payment_method, fetch_payment_methods, update_payment_method,
};
use crate::layout::global_context::AppGlobalContext;
use crate::shared::components::page_header::PageHeader;
use crate::system::auth::context::use_services;

/// Payment methods offered when paying purchase orders. The backend has no
/// delete for them.
#[component]
pub fn PaymentMethodList() -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let services = StoredValue::new_local(use_services());
    let methods = RwSignal::new(Vec::<PaymentMethod>::new());
    let loading = RwSignal::new(false);
    let saving = RwSignal::new(false);
    let editing = RwSignal::new(None::<i64>);
    let name = RwSignal::new(String::new());
    let description = RwSignal::new(String::new());

    let reset = move || {
        editing.set(None);
        name.set(String::new());
        description.set(String::new());
    };

    let fetch = move || {
        let client = services.get_value().api;
        loading.set(true);
        spawn_local(async move {
            match fetch_payment_methods(&client).await {
                Ok(items) => methods.set(items),
                Err(e) => ctx.show_error(&e),
            }
            loading.set(false);
        });
    };

    let save = move |_| {
        let dto = PaymentMethodDto {
            name: name.get_untracked().trim().to_string(),
            description: description.get_untracked().trim().to_string(),
        };
        if let Err(message) = dto.validate() {
            ctx.show_message(&message);
            return;
        }
        let client = services.get_value().api;
        let target = editing.get_untracked();
        saving.set(true);
        spawn_local(async move {
            let result = match target {
                Some(id) => update_payment_method(&client, id, &dto).await,
                None => create_payment_method(&client, &dto).await,
            };
            saving.set(false);
            match result {
                Ok(()) => {
                    ctx.show_success("Método de pago guardado");
                    reset();
                    fetch();
                }
                Err(e) => ctx.show_error(&e),
            }
        });
    };

    fetch();

    view! {
        <div class="page">
            <PageHeader title="Métodos de pago" loading=loading>
                <Button on_click=move |_| fetch()>"Actualizar"</Button>
            </PageHeader>

            <Card>
                <Flex gap=FlexGap::Medium>
                    <Input value=name placeholder="Nombre"/>
                    <Input value=description placeholder="Descripción"/>
                    <Button appearance=ButtonAppearance::Primary disabled=saving on_click=save>
                        {move || if editing.get().is_some() { "Actualizar" } else { "Agregar" }}
                    </Button>
                    <Button on_click=move |_| reset()>"Limpiar"</Button>
                </Flex>
            </Card>

            <Table>
                <TableHeader>
                    <TableRow>
                        <TableHeaderCell>"Nombre"</TableHeaderCell>
                        <TableHeaderCell>"Descripción"</TableHeaderCell>
                        <TableHeaderCell>""</TableHeaderCell>
                    </TableRow>
                </TableHeader>
                <TableBody>
                    {move || methods.get().into_iter().map(|method| {
                        let PaymentMethod { id, name: label, description: text } = method;
                        let (edit_name, edit_text) = (label.clone(), text.clone());
                        view! {
                            <TableRow>
                                <TableCell>{label}</TableCell>
                                <TableCell>{text}</TableCell>
                                <TableCell>
                                    <Button
                                        size=ButtonSize::Small
                                        on_click=move |_| {
                                            editing.set(Some(id));
                                            name.set(edit_name.clone());
                                            description.set(edit_text.clone());
                                        }
                                    >
                                        "Editar"
                                    </Button>
                                </TableCell>
                            </TableRow>
                        }
                    }).collect_view()}
                </TableBody>
            </Table>
        </div>
    }
}
