//! Dashboard state container.
//!
//! Every mutation of view state goes through [`DashboardState::apply`] with
//! one of the [`Action`] variants. Network completions carry the
//! [`RequestToken`] handed out when the request was issued; a completion
//! older than the latest request of its kind is dropped, so out-of-order
//! responses cannot overwrite fresher data.

use crate::domain::interaccion::Interaccion;
use crate::domain::ticket::{Estado, Prioridad, StatusFilter, Ticket, TicketDraft};
use crate::domain::usuario::Usuario;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Tickets,
    Users,
    Interactions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken {
    kind: RequestKind,
    seq: u64,
}

#[derive(Debug, Clone, Copy, Default)]
struct RequestSequences {
    tickets: u64,
    users: u64,
    interactions: u64,
}

impl RequestSequences {
    fn slot(&mut self, kind: RequestKind) -> &mut u64 {
        match kind {
            RequestKind::Tickets => &mut self.tickets,
            RequestKind::Users => &mut self.users,
            RequestKind::Interactions => &mut self.interactions,
        }
    }

    fn latest(&self, kind: RequestKind) -> u64 {
        match kind {
            RequestKind::Tickets => self.tickets,
            RequestKind::Users => self.users,
            RequestKind::Interactions => self.interactions,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Warning,
    Error,
}

/// A message the user must see, e.g. a failed mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftField {
    Usuario(String),
    Titulo(String),
    Descripcion(String),
    Prioridad(Prioridad),
}

#[derive(Debug, Clone)]
pub enum Action {
    TicketsLoaded {
        token: RequestToken,
        tickets: Vec<Ticket>,
    },
    TicketsFailed {
        token: RequestToken,
    },
    UsersLoaded {
        token: RequestToken,
        usuarios: Vec<Usuario>,
    },
    InteractionsLoaded {
        token: RequestToken,
        ticket_id: String,
        interacciones: Vec<Interaccion>,
    },
    InteractionsFailed {
        token: RequestToken,
        ticket_id: String,
    },
    SelectTicket(Ticket),
    SetFilter(StatusFilter),
    ToggleForm,
    EditDraft(DraftField),
    DraftSubmitted,
    StatusChanged {
        ticket_id: String,
        estado: Estado,
    },
    Notify(Notice),
}

#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    /// Last ticket list the backend returned, in server order.
    pub tickets: Vec<Ticket>,
    pub usuarios: Vec<Usuario>,
    /// Set while a ticket list request is outstanding.
    pub loading: bool,
    /// Ticket shown in the detail view.
    pub selected: Option<Ticket>,
    /// Interaction log of `selected`; empty when nothing is selected.
    pub interacciones: Vec<Interaccion>,
    pub filter: StatusFilter,
    pub draft: TicketDraft,
    pub show_form: bool,
    /// Messages waiting to be shown to the user.
    pub notices: Vec<Notice>,
    sequences: RequestSequences,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a token for a new request of `kind`. Starting a ticket list
    /// request raises the loading flag.
    pub fn begin(&mut self, kind: RequestKind) -> RequestToken {
        let slot = self.sequences.slot(kind);
        *slot += 1;
        if kind == RequestKind::Tickets {
            self.loading = true;
        }
        RequestToken { kind, seq: *slot }
    }

    fn is_current(&self, token: RequestToken) -> bool {
        token.seq == self.sequences.latest(token.kind)
    }

    fn is_selected(&self, ticket_id: &str) -> bool {
        self.selected
            .as_ref()
            .is_some_and(|ticket| ticket.id == ticket_id)
    }

    /// Applies `action`. Returns `false` when the action was dropped because
    /// it answers a superseded request.
    pub fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::TicketsLoaded { token, tickets } => {
                if !self.is_current(token) {
                    tracing::debug!(seq = token.seq, "dropping stale ticket list");
                    return false;
                }
                self.tickets = tickets;
                self.loading = false;
            }
            Action::TicketsFailed { token } => {
                if !self.is_current(token) {
                    return false;
                }
                self.loading = false;
            }
            Action::UsersLoaded { token, usuarios } => {
                if !self.is_current(token) {
                    return false;
                }
                self.usuarios = usuarios;
            }
            Action::InteractionsLoaded {
                token,
                ticket_id,
                interacciones,
            } => {
                if !self.is_current(token) || !self.is_selected(&ticket_id) {
                    tracing::debug!(%ticket_id, "dropping stale interactions");
                    return false;
                }
                self.interacciones = interacciones;
            }
            Action::InteractionsFailed { token, ticket_id } => {
                if !self.is_current(token) || !self.is_selected(&ticket_id) {
                    return false;
                }
                self.interacciones.clear();
            }
            Action::SelectTicket(ticket) => {
                if !self.is_selected(&ticket.id) {
                    self.interacciones.clear();
                }
                self.selected = Some(ticket);
            }
            Action::SetFilter(filter) => self.filter = filter,
            Action::ToggleForm => self.show_form = !self.show_form,
            Action::EditDraft(field) => match field {
                DraftField::Usuario(value) => self.draft.usuario_id = value,
                DraftField::Titulo(value) => self.draft.titulo = value,
                DraftField::Descripcion(value) => self.draft.descripcion = value,
                DraftField::Prioridad(value) => self.draft.prioridad = value,
            },
            Action::DraftSubmitted => {
                self.draft = TicketDraft::default();
                self.show_form = false;
            }
            Action::StatusChanged { ticket_id, estado } => {
                if !self.is_selected(&ticket_id) {
                    return false;
                }
                // Prefer the freshly loaded copy, but show the requested
                // state even if the list has not caught up yet.
                let mut updated = self
                    .tickets
                    .iter()
                    .find(|ticket| ticket.id == ticket_id)
                    .cloned()
                    .or_else(|| self.selected.clone());
                if let Some(ticket) = updated.as_mut() {
                    ticket.estado = estado;
                }
                self.selected = updated;
            }
            Action::Notify(notice) => self.notices.push(notice),
        }
        true
    }
}
