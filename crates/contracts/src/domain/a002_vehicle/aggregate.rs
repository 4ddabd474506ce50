use serde::{Deserialize, Serialize};

use crate::domain::a001_maintenance_job::{JobStatus, JobType};
use crate::domain::common::PersonRef;

/// Автомобиль клиента
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: i64,
    #[serde(default)]
    pub client_id: Option<i64>,
    #[serde(default)]
    pub client: Option<PersonRef>,
    pub brand: String,
    pub model: String,
    #[serde(default)]
    pub year: i32,
    pub license_plate: String,
    #[serde(default)]
    pub description: String,
}

impl Vehicle {
    /// "Toyota Corolla (ABC-123)"
    pub fn label(&self) -> String {
        format!("{} {} ({})", self.brand, self.model, self.license_plate)
    }

    pub fn owner_id(&self) -> Option<i64> {
        self.client_id.or_else(|| self.client.as_ref().map(|c| c.id))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVehicleDto {
    pub client_id: i64,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub license_plate: String,
    pub description: String,
}

impl CreateVehicleDto {
    pub fn validate(&self) -> Result<(), String> {
        if self.brand.trim().is_empty() {
            return Err("La marca es obligatoria".into());
        }
        if self.model.trim().is_empty() {
            return Err("El modelo es obligatorio".into());
        }
        if self.license_plate.trim().is_empty() {
            return Err("La placa es obligatoria".into());
        }
        if !(1900..=2100).contains(&self.year) {
            return Err("El año no es válido".into());
        }
        Ok(())
    }
}

/// Job as embedded in the customer's vehicle list (`GET /client/vehicles`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientJob {
    pub id: i64,
    #[serde(default)]
    pub description: String,
    pub job_type: JobType,
    pub status: JobStatus,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientVehicle {
    pub id: i64,
    pub brand: String,
    pub model: String,
    pub license_plate: String,
    #[serde(default)]
    pub year: i32,
    #[serde(default)]
    pub jobs: Vec<ClientJob>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto() -> CreateVehicleDto {
        CreateVehicleDto {
            client_id: 1,
            brand: "Mazda".into(),
            model: "3".into(),
            year: 2020,
            license_plate: "XYZ-987".into(),
            description: String::new(),
        }
    }

    #[test]
    fn test_validate_create_dto() {
        assert!(dto().validate().is_ok());

        let mut missing_plate = dto();
        missing_plate.license_plate = "  ".into();
        assert!(missing_plate.validate().is_err());

        let mut bad_year = dto();
        bad_year.year = 0;
        assert!(bad_year.validate().is_err());
    }

    #[test]
    fn test_owner_from_nested_client() {
        let vehicle: Vehicle = serde_json::from_str(
            r#"{"id":1,"client":{"id":42,"firstname":"Ana","lastname":"Ruiz"},"brand":"Kia","model":"Rio","licensePlate":"K-1"}"#,
        )
        .unwrap();
        assert_eq!(vehicle.owner_id(), Some(42));
        assert_eq!(vehicle.label(), "Kia Rio (K-1)");
    }
}
