use std::sync::Arc;

use crate::domain::interaccion::{Interaccion, NewInteraccion};
use crate::domain::presentation::{TicketStats, estado_label, filter_tickets};
use crate::domain::ticket::{Estado, Prioridad, StatusFilter, Ticket};
use crate::domain::usuario::Usuario;
use crate::error::{AppError, AppResult};
use crate::services::TicketService;
use crate::workflow::state::{Action, DashboardState, DraftField, Notice, RequestKind};

pub const NO_USERS_MESSAGE: &str = "No users available; create a user first.";

/// Client-side view-model over the ticket backend.
///
/// Each operation runs its requests in sequence: a mutation is awaited, then
/// the affected collection is fetched again, so local state is only ever a
/// copy of what the backend last reported.
pub struct Dashboard {
    service: Arc<dyn TicketService>,
    state: DashboardState,
}

impl Dashboard {
    pub fn new(service: Arc<dyn TicketService>) -> Self {
        Self {
            service,
            state: DashboardState::new(),
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    /// Initial load: tickets, then users.
    pub async fn load(&mut self) {
        self.load_tickets().await;
        self.load_users().await;
    }

    pub async fn load_tickets(&mut self) {
        let token = self.state.begin(RequestKind::Tickets);
        let action = match self.service.list_tickets().await {
            Ok(tickets) => {
                tracing::debug!(count = tickets.len(), "loaded tickets");
                Action::TicketsLoaded { token, tickets }
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to load tickets");
                Action::TicketsFailed { token }
            }
        };
        self.state.apply(action);
    }

    pub async fn load_users(&mut self) {
        let token = self.state.begin(RequestKind::Users);
        match self.service.list_users().await {
            Ok(usuarios) => {
                self.state.apply(Action::UsersLoaded { token, usuarios });
            }
            Err(err) => tracing::error!(error = %err, "failed to load users"),
        }
    }

    pub async fn load_interactions(&mut self, ticket_id: &str) {
        let token = self.state.begin(RequestKind::Interactions);
        let action = match self.service.list_interactions(ticket_id).await {
            Ok(interacciones) => Action::InteractionsLoaded {
                token,
                ticket_id: ticket_id.to_string(),
                interacciones,
            },
            Err(err) => {
                tracing::error!(error = %err, ticket_id, "failed to load interactions");
                Action::InteractionsFailed {
                    token,
                    ticket_id: ticket_id.to_string(),
                }
            }
        };
        self.state.apply(action);
    }

    /// Opens the detail view for `ticket_id` and loads its interaction log.
    /// Tickets outside the loaded list are fetched individually.
    pub async fn select_ticket(&mut self, ticket_id: &str) -> AppResult<()> {
        let known = self
            .state
            .tickets
            .iter()
            .find(|ticket| ticket.id == ticket_id)
            .cloned();
        let ticket = match known {
            Some(ticket) => ticket,
            None => match self.service.get_ticket(ticket_id).await {
                Ok(ticket) => ticket,
                Err(err) => {
                    self.notify_error("Error loading ticket", &err);
                    return Err(err);
                }
            },
        };

        self.state.apply(Action::SelectTicket(ticket));
        self.load_interactions(ticket_id).await;
        Ok(())
    }

    pub fn set_filter(&mut self, filter: StatusFilter) {
        self.state.apply(Action::SetFilter(filter));
    }

    pub fn toggle_form(&mut self) {
        self.state.apply(Action::ToggleForm);
    }

    pub fn edit_draft(&mut self, field: DraftField) {
        self.state.apply(Action::EditDraft(field));
    }

    /// Submits the draft. On success the draft is cleared, the form closed
    /// and the list re-fetched; on failure the draft is kept for a retry.
    pub async fn submit_draft(&mut self) -> AppResult<Ticket> {
        let mut draft = self.state.draft.clone();
        if matches!(&draft.prioridad, Prioridad::Other(value) if value.trim().is_empty()) {
            draft.prioridad = Prioridad::Media;
        }

        if let Err(err) = draft.validate() {
            self.notify_error("Error creating ticket", &err);
            return Err(err);
        }

        match self.service.create_ticket(&draft).await {
            Ok(ticket) => {
                tracing::info!(ticket_id = %ticket.id, "ticket created");
                self.state.apply(Action::DraftSubmitted);
                self.load_tickets().await;
                Ok(ticket)
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to create ticket");
                self.notify_error("Error creating ticket", &err);
                Err(err)
            }
        }
    }

    /// Moves `ticket_id` to `estado` on behalf of `actor` (see
    /// [`resolve_actor`]). Any target other than the current estado is
    /// offered; the backend decides whether the transition is allowed and
    /// logs it as an interaction.
    pub async fn change_status(
        &mut self,
        ticket_id: &str,
        estado: Estado,
        actor: Option<&str>,
    ) -> AppResult<()> {
        let resolved = match self.current_estado(ticket_id) {
            Some(current) if *current == estado => Err(AppError::Precondition(format!(
                "ticket {ticket_id} is already {}",
                estado_label(&estado)
            ))),
            _ => resolve_actor(&self.state.usuarios, actor)
                .map(|usuario| (usuario.id.clone(), usuario.display_name())),
        };
        let (usuario_id, actor_name) = match resolved {
            Ok(actor) => actor,
            Err(err) => {
                self.state.apply(Action::Notify(Notice::error(err.to_string())));
                return Err(err);
            }
        };
        if actor.is_none() {
            let message = format!("No acting user given; attributing the change to {actor_name}.");
            self.state.apply(Action::Notify(Notice::warning(message)));
        }

        match self
            .service
            .update_status(ticket_id, &estado, &usuario_id)
            .await
        {
            Ok(ack) => tracing::info!(
                ticket_id,
                nuevo_estado = %estado,
                usuario_id = %usuario_id,
                mensaje = ack.mensaje.as_deref().unwrap_or_default(),
                "status updated"
            ),
            Err(err) => {
                tracing::error!(error = %err, ticket_id, "failed to update status");
                self.notify_error("Error updating status", &err);
                return Err(err);
            }
        }

        self.load_tickets().await;
        if self.state.apply(Action::StatusChanged {
            ticket_id: ticket_id.to_string(),
            estado,
        }) {
            self.load_interactions(ticket_id).await;
        }
        Ok(())
    }

    /// Appends a comment to a ticket's log and refreshes the log when that
    /// ticket is open. An explicit `actor` must be a loaded user; without
    /// one the comment is anonymous.
    pub async fn add_comment(
        &mut self,
        ticket_id: &str,
        contenido: &str,
        actor: Option<&str>,
    ) -> AppResult<Interaccion> {
        let prepared = if contenido.trim().is_empty() {
            Err(AppError::Precondition(
                "comment text must not be empty".to_string(),
            ))
        } else {
            match actor {
                Some(_) => resolve_actor(&self.state.usuarios, actor).map(|u| Some(u.id.clone())),
                None => Ok(None),
            }
        };
        let usuario_id = match prepared {
            Ok(usuario_id) => usuario_id,
            Err(err) => {
                self.state.apply(Action::Notify(Notice::error(err.to_string())));
                return Err(err);
            }
        };

        let body = NewInteraccion::comment(ticket_id, usuario_id.as_deref(), contenido);
        match self.service.create_interaction(&body).await {
            Ok(created) => {
                let is_open = self
                    .state
                    .selected
                    .as_ref()
                    .is_some_and(|ticket| ticket.id == ticket_id);
                if is_open {
                    self.load_interactions(ticket_id).await;
                }
                Ok(created)
            }
            Err(err) => {
                tracing::error!(error = %err, ticket_id, "failed to add comment");
                self.notify_error("Error adding comment", &err);
                Err(err)
            }
        }
    }

    pub fn visible_tickets(&self) -> Vec<&Ticket> {
        filter_tickets(&self.state.tickets, &self.state.filter)
    }

    pub fn stats(&self) -> TicketStats {
        TicketStats::from_tickets(&self.state.tickets)
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.state.notices)
    }

    /// Estado of `ticket_id` as last seen, preferring the open detail view.
    fn current_estado(&self, ticket_id: &str) -> Option<&Estado> {
        self.state
            .selected
            .iter()
            .chain(&self.state.tickets)
            .find(|ticket| ticket.id == ticket_id)
            .map(|ticket| &ticket.estado)
    }

    fn notify_error(&mut self, context: &str, err: &AppError) {
        let message = format!("{context}: {}", err.user_detail());
        self.state.apply(Action::Notify(Notice::error(message)));
    }
}

/// Picks the user a status change is attributed to.
///
/// There is no signed-in user, so an explicit id is checked against the
/// loaded users and, when absent, the first loaded user stands in.
pub fn resolve_actor<'a>(usuarios: &'a [Usuario], requested: Option<&str>) -> AppResult<&'a Usuario> {
    let first = usuarios
        .first()
        .ok_or_else(|| AppError::Precondition(NO_USERS_MESSAGE.to_string()))?;

    match requested.map(str::trim).filter(|id| !id.is_empty()) {
        Some(id) => usuarios
            .iter()
            .find(|usuario| usuario.id == id)
            .ok_or_else(|| AppError::Precondition(format!("unknown user '{id}'"))),
        None => {
            tracing::warn!(usuario_id = %first.id, "no acting user given, using the first loaded user");
            Ok(first)
        }
    }
}
