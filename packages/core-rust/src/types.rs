use serde::{Deserialize, Serialize};

/// Agricultural producer record as stored in the `producers` table.
///
/// Serialized with camelCase keys so responses echo the request shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Producer {
    /// Generated primary key.
    pub id: i32,
    /// CPF (11 digits) or CNPJ (14 digits) of the owner.
    pub cpf_cnpj: String,
    pub producer_name: String,
    pub farm_name: String,
    pub city: String,
    pub state: String,
    /// Total farm area in hectares.
    pub total_area: f64,
    /// Area available for cultivation in hectares.
    pub cultivable_area: f64,
    /// Area covered by native vegetation in hectares.
    pub vegetation_area: f64,
    /// Crops planted on the farm (e.g. `"soy"`, `"corn"`).
    pub crops: Vec<String>,
}

/// Validated write payload: every mutable column of a [`Producer`].
///
/// Used for both inserts and full-row replacement, so updates never
/// carry partial data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct NewProducer {
    pub cpf_cnpj: String,
    pub producer_name: String,
    pub farm_name: String,
    pub city: String,
    pub state: String,
    pub total_area: f64,
    pub cultivable_area: f64,
    pub vegetation_area: f64,
    pub crops: Vec<String>,
}

impl NewProducer {
    /// Attaches a generated id, producing the stored record.
    #[must_use]
    pub fn with_id(self, id: i32) -> Producer {
        Producer {
            id,
            cpf_cnpj: self.cpf_cnpj,
            producer_name: self.producer_name,
            farm_name: self.farm_name,
            city: self.city,
            state: self.state,
            total_area: self.total_area,
            cultivable_area: self.cultivable_area,
            vegetation_area: self.vegetation_area,
            crops: self.crops,
        }
    }
}

/// Aggregate statistics served by the dashboard endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Number of producer rows.
    pub total_farms: i64,
    /// Sum of `totalArea` across all rows; 0 when there are none.
    pub total_area: f64,
}
