use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::opaque_id;
use crate::error::{AppError, AppResult};

/// Workflow stage of a ticket. Values the client does not know decode into
/// `Other` so a newer backend never breaks listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Estado {
    Abierto,
    EnProceso,
    Resuelto,
    Cerrado,
    Other(String),
}

impl Estado {
    pub const ALL: [Estado; 4] = [
        Estado::Abierto,
        Estado::EnProceso,
        Estado::Resuelto,
        Estado::Cerrado,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Estado::Abierto => "abierto",
            Estado::EnProceso => "en_proceso",
            Estado::Resuelto => "resuelto",
            Estado::Cerrado => "cerrado",
            Estado::Other(value) => value,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "abierto" => Some(Estado::Abierto),
            "en_proceso" | "en-proceso" => Some(Estado::EnProceso),
            "resuelto" => Some(Estado::Resuelto),
            "cerrado" => Some(Estado::Cerrado),
            _ => None,
        }
    }
}

impl From<String> for Estado {
    fn from(value: String) -> Self {
        Estado::parse(&value).unwrap_or(Estado::Other(value))
    }
}

impl From<Estado> for String {
    fn from(value: Estado) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Estado {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Urgency tier of a ticket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Prioridad {
    Baja,
    #[default]
    Media,
    Alta,
    Critica,
    Other(String),
}

impl Prioridad {
    pub const ALL: [Prioridad; 4] = [
        Prioridad::Baja,
        Prioridad::Media,
        Prioridad::Alta,
        Prioridad::Critica,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Prioridad::Baja => "baja",
            Prioridad::Media => "media",
            Prioridad::Alta => "alta",
            Prioridad::Critica => "critica",
            Prioridad::Other(value) => value,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "baja" => Some(Prioridad::Baja),
            "media" => Some(Prioridad::Media),
            "alta" => Some(Prioridad::Alta),
            "critica" | "crítica" => Some(Prioridad::Critica),
            _ => None,
        }
    }
}

impl From<String> for Prioridad {
    fn from(value: String) -> Self {
        Prioridad::parse(&value).unwrap_or(Prioridad::Other(value))
    }
}

impl From<Prioridad> for String {
    fn from(value: Prioridad) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Prioridad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    #[serde(deserialize_with = "opaque_id")]
    pub id: String,
    #[serde(deserialize_with = "opaque_id")]
    pub usuario_id: String,
    pub titulo: String,
    #[serde(default)]
    pub descripcion: String,
    pub estado: Estado,
    #[serde(default)]
    pub prioridad: Prioridad,
    #[serde(default)]
    pub fecha_creacion: Option<String>,
    #[serde(default)]
    pub fecha_actualizacion: Option<String>,
}

/// Client-side buffer for the ticket creation form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TicketDraft {
    pub usuario_id: String,
    pub titulo: String,
    pub descripcion: String,
    pub prioridad: Prioridad,
}

impl TicketDraft {
    pub fn validate(&self) -> AppResult<()> {
        let missing = [
            ("usuario_id", &self.usuario_id),
            ("titulo", &self.titulo),
            ("descripcion", &self.descripcion),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect::<Vec<_>>();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(AppError::Precondition(format!(
                "missing required fields: {}",
                missing.join(", ")
            )))
        }
    }
}

/// Status selector for the ticket list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    Todos,
    Estado(Estado),
}

impl StatusFilter {
    pub fn matches(&self, estado: &Estado) -> bool {
        match self {
            StatusFilter::Todos => true,
            StatusFilter::Estado(wanted) => wanted == estado,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            StatusFilter::Todos => "todos",
            StatusFilter::Estado(estado) => estado.as_str(),
        }
    }
}

impl std::str::FromStr for StatusFilter {
    type Err = AppError;

    fn from_str(value: &str) -> AppResult<Self> {
        if value.trim().eq_ignore_ascii_case("todos") {
            return Ok(StatusFilter::Todos);
        }
        Estado::parse(value).map(StatusFilter::Estado).ok_or_else(|| {
            AppError::Precondition(format!(
                "unknown status filter '{value}', expected todos, abierto, en_proceso, resuelto or cerrado"
            ))
        })
    }
}
