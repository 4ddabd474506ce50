use serde::{Deserialize, Serialize};

/// Способ оплаты, используемый при оплате заказов
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethod {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentMethodDto {
    pub name: String,
    pub description: String,
}

impl PaymentMethodDto {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("El nombre es obligatorio".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_description_defaults() {
        let method: PaymentMethod = serde_json::from_str(r#"{"id":1,"name":"Transferencia"}"#).unwrap();
        assert_eq!(method.description, "");
    }

    #[test]
    fn test_name_required() {
        assert!(PaymentMethodDto::default().validate().is_err());
    }
}
