use serde::{Deserialize, Serialize};

/// Поставщик запчастей
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub contact_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProviderDto {
    pub name: String,
    pub contact_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

impl CreateProviderDto {
    pub fn from_provider(provider: &Provider) -> Self {
        Self {
            name: provider.name.clone(),
            contact_name: provider.contact_name.clone(),
            email: provider.email.clone(),
            phone: provider.phone.clone(),
            address: provider.address.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("El nombre es obligatorio".into());
        }
        let email = self.email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err("El correo no es válido".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_provider() {
        let raw = r#"{"id":4,"name":"Repuestos Sur","contactName":"Luis","email":"ventas@sur.com","phone":"555","address":"Av. 1","createdAt":"2025-01-01T00:00:00"}"#;
        let provider: Provider = serde_json::from_str(raw).unwrap();
        assert_eq!(provider.contact_name, "Luis");
        assert_eq!(CreateProviderDto::from_provider(&provider).email, "ventas@sur.com");
    }

    #[test]
    fn test_validate() {
        let mut dto = CreateProviderDto {
            name: "Repuestos Sur".into(),
            email: "ventas@sur.com".into(),
            ..Default::default()
        };
        assert!(dto.validate().is_ok());
        dto.email = "ventas".into();
        assert_eq!(dto.validate().unwrap_err(), "El correo no es válido");
        dto.name = " ".into();
        assert_eq!(dto.validate().unwrap_err(), "El nombre es obligatorio");
    }
}
