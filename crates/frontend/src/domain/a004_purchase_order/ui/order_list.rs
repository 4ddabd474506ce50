use contracts::domain::a004_purchase_order::{OrderAction, OrderStatus, PurchaseOrder};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::domain::a004_purchase_order::api::{apply_action, fetch_orders};
use crate::layout::global_context::AppGlobalContext;
use crate::shared::components::page_header::PageHeader;
use crate::system::auth::context::use_services;

/// "1234.5" -> "$ 1.234,50"
pub fn format_amount(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as i64;
    let units = (cents / 100).to_string();
    let mut grouped = String::new();
    for (i, ch) in units.chars().enumerate() {
        if i > 0 && (units.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}$ {},{:02}", sign, grouped, cents % 100)
}

fn status_color(status: OrderStatus) -> BadgeColor {
    match status {
        OrderStatus::Pending | OrderStatus::Paid => BadgeColor::Informative,
        OrderStatus::Delivered | OrderStatus::Completed => BadgeColor::Success,
        OrderStatus::Delayed => BadgeColor::Warning,
        OrderStatus::Cancelled => BadgeColor::Danger,
    }
}

/// Supplier view of purchase orders
#[component]
pub fn OrderList() -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let services = StoredValue::new_local(use_services());
    let orders = RwSignal::new(Vec::<PurchaseOrder>::new());
    let loading = RwSignal::new(false);
    let busy = RwSignal::new(None::<i64>);

    let fetch = move || {
        let client = services.get_value().api;
        loading.set(true);
        spawn_local(async move {
            match fetch_orders(&client).await {
                Ok(items) => orders.set(items),
                Err(e) => ctx.show_error(&e),
            }
            loading.set(false);
        });
    };

    let run_action = move |id: i64, action: OrderAction| {
        let client = services.get_value().api;
        busy.set(Some(id));
        spawn_local(async move {
            match apply_action(&client, id, action).await {
                Ok(()) => {
                    ctx.show_success(&format!("Orden #{}: {}", id, action.label()));
                    fetch();
                }
                Err(e) => ctx.show_error(&e),
            }
            busy.set(None);
        });
    };

    fetch();

    view! {
        <div class="page">
            <PageHeader title="Órdenes de compra" loading=loading>
                <Button on_click=move |_| fetch()>"Actualizar"</Button>
            </PageHeader>

            <Table>
                <TableHeader>
                    <TableRow>
                        <TableHeaderCell>"Orden"</TableHeaderCell>
                        <TableHeaderCell>"Proveedor"</TableHeaderCell>
                        <TableHeaderCell>"Total"</TableHeaderCell>
                        <TableHeaderCell>"Estado"</TableHeaderCell>
                        <TableHeaderCell>""</TableHeaderCell>
                    </TableRow>
                </TableHeader>
                <TableBody>
                    {move || orders.get().into_iter().map(|order| {
                        let id = order.id;
                        let status = order.status;
                        let provider = order.provider.map(|p| p.name).unwrap_or_else(|| "-".to_string());
                        view! {
                            <TableRow>
                                <TableCell>{format!("#{}", id)}</TableCell>
                                <TableCell>{provider}</TableCell>
                                <TableCell class="text-right">{format_amount(order.total_amount)}</TableCell>
                                <TableCell>
                                    <Badge appearance=BadgeAppearance::Tint color=status_color(status)>
                                        {status.display_name()}
                                    </Badge>
                                </TableCell>
                                <TableCell>
                                    <Flex gap=FlexGap::Small>
                                        {OrderAction::available_for(status).into_iter().map(|action| view! {
                                            <Button
                                                size=ButtonSize::Small
                                                disabled=Signal::derive(move || busy.get() == Some(id))
                                                on_click=move |_| run_action(id, action)
                                            >
                                                {action.label()}
                                            </Button>
                                        }).collect_view()}
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(1234.5), "$ 1.234,50");
        assert_eq!(format_amount(0.0), "$ 0,00");
        assert_eq!(format_amount(999.999), "$ 1.000,00");
        assert_eq!(format_amount(1_000_000.0), "$ 1.000.000,00");
    }
}
