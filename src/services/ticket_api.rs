use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::interaccion::{Interaccion, NewInteraccion};
use crate::domain::ticket::{Estado, Ticket, TicketDraft};
use crate::domain::usuario::Usuario;
use crate::error::AppResult;

/// The ticket backend as the dashboard consumes it. The backend owns
/// persistence, transition rules and timestamps; implementors only move data.
#[async_trait]
pub trait TicketService: Send + Sync {
    async fn list_tickets(&self) -> AppResult<Vec<Ticket>>;
    async fn get_ticket(&self, ticket_id: &str) -> AppResult<Ticket>;
    async fn list_users(&self) -> AppResult<Vec<Usuario>>;
    async fn list_interactions(&self, ticket_id: &str) -> AppResult<Vec<Interaccion>>;
    async fn create_ticket(&self, draft: &TicketDraft) -> AppResult<Ticket>;
    async fn update_status(
        &self,
        ticket_id: &str,
        estado: &Estado,
        usuario_id: &str,
    ) -> AppResult<StatusUpdate>;
    async fn create_interaction(&self, interaction: &NewInteraccion) -> AppResult<Interaccion>;
    async fn health(&self) -> AppResult<HealthReport>;
}

/// Acknowledgement returned by the status endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StatusUpdate {
    #[serde(default)]
    pub mensaje: Option<String>,
    #[serde(default)]
    pub estado: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthReport {
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub services: std::collections::BTreeMap<String, String>,
}

impl HealthReport {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}
