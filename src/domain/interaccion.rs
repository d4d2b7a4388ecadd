use serde::{Deserialize, Serialize};

use crate::domain::{opaque_id, optional_opaque_id};

pub const TIPO_COMENTARIO: &str = "comentario";

/// Log entry attached to exactly one ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaccion {
    #[serde(deserialize_with = "opaque_id")]
    pub id: String,
    #[serde(default, deserialize_with = "optional_opaque_id")]
    pub ticket_id: Option<String>,
    #[serde(default, deserialize_with = "optional_opaque_id")]
    pub usuario_id: Option<String>,
    pub tipo: String,
    pub contenido: String,
    #[serde(default)]
    pub fecha_creacion: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewInteraccion {
    pub ticket_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usuario_id: Option<String>,
    pub tipo: String,
    pub contenido: String,
}

impl NewInteraccion {
    pub fn comment(ticket_id: &str, usuario_id: Option<&str>, contenido: &str) -> Self {
        Self {
            ticket_id: ticket_id.to_string(),
            usuario_id: usuario_id.map(str::to_string),
            tipo: TIPO_COMENTARIO.to_string(),
            contenido: contenido.trim().to_string(),
        }
    }
}
