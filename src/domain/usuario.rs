use serde::{Deserialize, Serialize};

use crate::domain::opaque_id;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Usuario {
    #[serde(deserialize_with = "opaque_id")]
    pub id: String,
    pub nombre: String,
    pub email: String,
    #[serde(default)]
    pub rol: Option<String>,
    #[serde(default)]
    pub activo: Option<bool>,
}

impl Usuario {
    /// `nombre (email)`, the form used in selection lists.
    pub fn display_name(&self) -> String {
        format!("{} ({})", self.nombre, self.email)
    }
}
