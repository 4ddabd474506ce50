use serde::{Deserialize, Serialize};

/// Роли пользователей мастерской (идентификаторы совпадают с backend)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RoleRepr", into = "String")]
pub enum UserRole {
    Admin,
    Employee,
    Specialist,
    Customer,
    Supplier,
}

/// Backend sends the role either as its numeric id or as its name.
#[derive(Deserialize)]
#[serde(untagged)]
enum RoleRepr {
    Id(i64),
    Name(String),
}

impl TryFrom<RoleRepr> for UserRole {
    type Error = String;

    fn try_from(value: RoleRepr) -> Result<Self, Self::Error> {
        match value {
            RoleRepr::Id(id) => UserRole::from_id(id).ok_or_else(|| format!("Unknown role id: {}", id)),
            RoleRepr::Name(name) => {
                UserRole::from_code(&name).ok_or_else(|| format!("Unknown role: {}", name))
            }
        }
    }
}

impl From<UserRole> for String {
    fn from(role: UserRole) -> Self {
        role.code().to_string()
    }
}

impl UserRole {
    /// Numeric role id used by the backend
    pub fn id(&self) -> i64 {
        match self {
            UserRole::Admin => 1,
            UserRole::Employee => 2,
            UserRole::Specialist => 3,
            UserRole::Customer => 4,
            UserRole::Supplier => 5,
        }
    }

    pub fn from_id(id: i64) -> Option<Self> {
        match id {
            1 => Some(UserRole::Admin),
            2 => Some(UserRole::Employee),
            3 => Some(UserRole::Specialist),
            4 => Some(UserRole::Customer),
            5 => Some(UserRole::Supplier),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            UserRole::Admin => "ADMIN",
            UserRole::Employee => "EMPLOYEE",
            UserRole::Specialist => "SPECIALIST",
            UserRole::Customer => "CUSTOMER",
            UserRole::Supplier => "SUPPLIER",
        }
    }

    /// Parse a role name, case-insensitive, with an optional `ROLE_` prefix
    pub fn from_code(code: &str) -> Option<Self> {
        let normalized = code.trim().to_ascii_uppercase();
        match normalized.trim_start_matches("ROLE_") {
            "ADMIN" => Some(UserRole::Admin),
            "EMPLOYEE" => Some(UserRole::Employee),
            "SPECIALIST" => Some(UserRole::Specialist),
            "CUSTOMER" | "CLIENT" => Some(UserRole::Customer),
            "SUPPLIER" | "PROVIDER" => Some(UserRole::Supplier),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            UserRole::Admin => "Administrador",
            UserRole::Employee => "Empleado",
            UserRole::Specialist => "Especialista",
            UserRole::Customer => "Cliente",
            UserRole::Supplier => "Proveedor",
        }
    }

    /// Dashboard path the user is redirected to after login
    pub fn dashboard_path(&self) -> &'static str {
        match self {
            UserRole::Admin => "/dashboard/admin",
            UserRole::Employee => "/dashboard/employee",
            UserRole::Specialist => "/dashboard/specialist",
            UserRole::Customer => "/dashboard/customer",
            UserRole::Supplier => "/dashboard/supplier",
        }
    }

    pub fn all() -> Vec<UserRole> {
        vec![
            UserRole::Admin,
            UserRole::Employee,
            UserRole::Specialist,
            UserRole::Customer,
            UserRole::Supplier,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_from_id_and_name() {
        let by_id: UserRole = serde_json::from_str("2").unwrap();
        assert_eq!(by_id, UserRole::Employee);

        let by_name: UserRole = serde_json::from_str("\"ROLE_SUPPLIER\"").unwrap();
        assert_eq!(by_name, UserRole::Supplier);

        assert!(serde_json::from_str::<UserRole>("9").is_err());
        assert!(serde_json::from_str::<UserRole>("\"MECHANIC\"").is_err());
    }

    #[test]
    fn test_dashboard_paths_are_unique() {
        let mut paths: Vec<_> = UserRole::all().iter().map(|r| r.dashboard_path()).collect();
        paths.sort();
        paths.dedup();
        assert_eq!(paths.len(), UserRole::all().len());
        assert_eq!(UserRole::Admin.dashboard_path(), "/dashboard/admin");
    }

    #[test]
    fn test_id_round_trip() {
        for role in UserRole::all() {
            assert_eq!(UserRole::from_id(role.id()), Some(role));
        }
    }
}
