//! Role dashboards
//!
//! Each role gets a fixed list of sections; the sidebar lists them and
//! `RoleDashboard` renders the selected one.

use contracts::enums::user_role::UserRole;
use leptos::prelude::*;

use crate::domain::a001_maintenance_job::ui::{AllJobs, MyJobs};
use crate::domain::a002_vehicle::ui::{ClientVehicles, VehicleList};
use crate::domain::a003_job_advice::ui::JobAdviceList;
use crate::domain::a004_purchase_order::ui::OrderList;
use crate::domain::a005_provider::ui::ProviderList;
use crate::domain::a006_payment_method::ui::PaymentMethodList;
use crate::layout::global_context::AppGlobalContext;
use crate::system::auth::guard::RequireRole;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardSection {
    pub key: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
}

const fn section(key: &'static str, label: &'static str, icon: &'static str) -> DashboardSection {
    DashboardSection { key, label, icon }
}

const ADMIN: &[DashboardSection] = &[
    section("jobs", "Trabajos", "wrench"),
    section("vehicles", "Vehículos", "car"),
    section("providers", "Proveedores", "truck"),
    section("payments", "Métodos de pago", "credit-card"),
];
const EMPLOYEE: &[DashboardSection] = &[section("my_jobs", "Mis trabajos", "wrench")];
const SPECIALIST: &[DashboardSection] = &[section("advice", "Solicitudes de apoyo", "help")];
const CUSTOMER: &[DashboardSection] = &[section("my_vehicles", "Mis vehículos", "car")];
const SUPPLIER: &[DashboardSection] = &[section("orders", "Órdenes de compra", "orders")];

pub fn sections_for(role: UserRole) -> &'static [DashboardSection] {
    match role {
        UserRole::Admin => ADMIN,
        UserRole::Employee => EMPLOYEE,
        UserRole::Specialist => SPECIALIST,
        UserRole::Customer => CUSTOMER,
        UserRole::Supplier => SUPPLIER,
    }
}

/// Section to show for `role`; unknown or missing keys fall back to the first one
pub fn resolve_section(role: UserRole, requested: Option<&str>) -> DashboardSection {
    let sections = sections_for(role);
    requested
        .and_then(|key| sections.iter().find(|s| s.key == key))
        .copied()
        .unwrap_or(sections[0])
}

#[component]
pub fn RoleDashboard(role: UserRole) -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let current = move || resolve_section(role, ctx.section.get().as_deref()).key;

    view! {
        <RequireRole roles=vec![role]>
            {move || match (role, current()) {
                (UserRole::Admin, "vehicles") => view! { <VehicleList/> }.into_any(),
                (UserRole::Admin, "providers") => view! { <ProviderList/> }.into_any(),
                (UserRole::Admin, "payments") => view! { <PaymentMethodList/> }.into_any(),
                (UserRole::Admin, _) => view! { <AllJobs/> }.into_any(),
                (UserRole::Employee, _) => view! { <MyJobs/> }.into_any(),
                (UserRole::Specialist, _) => view! { <JobAdviceList/> }.into_any(),
                (UserRole::Customer, _) => view! { <ClientVehicles/> }.into_any(),
                (UserRole::Supplier, _) => view! { <OrderList/> }.into_any(),
            }}
        </RequireRole>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_role_has_a_section() {
        for role in UserRole::all() {
            assert!(!sections_for(role).is_empty(), "{:?}", role);
        }
    }

    #[test]
    fn test_resolve_section_falls_back_to_first() {
        assert_eq!(resolve_section(UserRole::Admin, Some("vehicles")).key, "vehicles");
        assert_eq!(resolve_section(UserRole::Admin, Some("payments")).key, "payments");
        assert_eq!(resolve_section(UserRole::Admin, None).key, "jobs");
        // A key from another role's dashboard
        assert_eq!(resolve_section(UserRole::Customer, Some("vehicles")).key, "my_vehicles");
    }
}
