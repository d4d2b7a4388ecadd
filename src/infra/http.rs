use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, header::ACCEPT};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::interaccion::{Interaccion, NewInteraccion};
use crate::domain::ticket::{Estado, Ticket, TicketDraft};
use crate::domain::usuario::Usuario;
use crate::error::{AppError, AppResult};
use crate::services::{HealthReport, StatusUpdate, TicketService};

/// `TicketService` over the backend's REST API.
pub struct HttpTicketClient {
    http: Client,
    base_url: String,
}

impl HttpTicketClient {
    pub fn new(base_url: &str, timeout: Duration) -> AppResult<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| AppError::Configuration(format!("failed to build HTTP client: {err}")))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn tickets_url(&self) -> String {
        self.endpoint("tickets")
    }

    fn ticket_url(&self, ticket_id: &str) -> String {
        self.endpoint(&format!("tickets/{ticket_id}"))
    }

    fn interactions_url(&self, ticket_id: &str) -> String {
        self.endpoint(&format!("tickets/{ticket_id}/interacciones"))
    }

    fn status_url(&self, ticket_id: &str) -> String {
        self.endpoint(&format!("tickets/{ticket_id}/estado"))
    }

    async fn send(&self, request: RequestBuilder, what: &str) -> AppResult<Response> {
        let response = request
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|err| AppError::Transport(format!("{what}: {err}")))?;

        let status = response.status();
        tracing::debug!(%status, what, "ticket API responded");
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(AppError::Api {
            status,
            detail: extract_detail(&body),
        })
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder, what: &str) -> AppResult<T> {
        let response = self.send(request, what).await?;
        response
            .json::<T>()
            .await
            .map_err(|err| AppError::Decode(format!("{what}: {err}")))
    }
}

/// Pulls a human-readable message out of an error body. The backend reports
/// failures as `{"detail": ...}`; validation failures carry a structured
/// detail, which is rendered as JSON.
pub fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::Null => None,
        Value::String(text) if text.trim().is_empty() => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

#[async_trait]
impl TicketService for HttpTicketClient {
    async fn list_tickets(&self) -> AppResult<Vec<Ticket>> {
        let url = self.tickets_url();
        tracing::debug!(%url, "GET tickets");
        self.fetch(self.http.get(url), "list tickets").await
    }

    async fn get_ticket(&self, ticket_id: &str) -> AppResult<Ticket> {
        let url = self.ticket_url(ticket_id);
        tracing::debug!(%url, "GET ticket");
        self.fetch(self.http.get(url), "get ticket").await
    }

    async fn list_users(&self) -> AppResult<Vec<Usuario>> {
        let url = self.endpoint("usuarios");
        tracing::debug!(%url, "GET usuarios");
        self.fetch(self.http.get(url), "list users").await
    }

    async fn list_interactions(&self, ticket_id: &str) -> AppResult<Vec<Interaccion>> {
        let url = self.interactions_url(ticket_id);
        tracing::debug!(%url, "GET interacciones");
        self.fetch(self.http.get(url), "list interactions").await
    }

    async fn create_ticket(&self, draft: &TicketDraft) -> AppResult<Ticket> {
        let url = self.tickets_url();
        tracing::debug!(%url, titulo = %draft.titulo, "POST ticket");
        self.fetch(self.http.post(url).json(draft), "create ticket")
            .await
    }

    async fn update_status(
        &self,
        ticket_id: &str,
        estado: &Estado,
        usuario_id: &str,
    ) -> AppResult<StatusUpdate> {
        let url = self.status_url(ticket_id);
        tracing::debug!(%url, nuevo_estado = %estado, usuario_id, "PATCH estado");
        let request = self
            .http
            .patch(url)
            .query(&[("nuevo_estado", estado.as_str()), ("usuario_id", usuario_id)]);
        let response = self.send(request, "update status").await?;

        // The acknowledgement body is informational only.
        let body = response
            .text()
            .await
            .map_err(|err| AppError::Transport(format!("update status: {err}")))?;
        Ok(serde_json::from_str(&body).unwrap_or_default())
    }

    async fn create_interaction(&self, interaction: &NewInteraccion) -> AppResult<Interaccion> {
        let url = self.endpoint("interacciones");
        tracing::debug!(%url, ticket_id = %interaction.ticket_id, "POST interaccion");
        self.fetch(self.http.post(url).json(interaction), "create interaction")
            .await
    }

    async fn health(&self) -> AppResult<HealthReport> {
        let url = self.endpoint("health");
        self.fetch(self.http.get(url), "health check").await
    }
}
