//! Dashboard scenarios against an in-memory backend that records every call
//! in `METHOD path` form.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use reqwest::StatusCode;
use tokio::sync::Mutex;

use crate::domain::interaccion::{Interaccion, NewInteraccion};
use crate::domain::ticket::{Estado, Prioridad, StatusFilter, Ticket, TicketDraft};
use crate::domain::usuario::Usuario;
use crate::error::{AppError, AppResult};
use crate::services::{HealthReport, StatusUpdate, TicketService};
use crate::workflow::dashboard::{Dashboard, NO_USERS_MESSAGE, resolve_actor};
use crate::workflow::state::{DraftField, NoticeLevel};

// ============================================================================
// Fake backend
// ============================================================================

#[derive(Default)]
struct Backend {
    tickets: Vec<Ticket>,
    usuarios: Vec<Usuario>,
    interacciones: HashMap<String, Vec<Interaccion>>,
    next_id: u32,
}

#[derive(Default)]
struct RecordingService {
    calls: Mutex<Vec<String>>,
    backend: Mutex<Backend>,
    fail_list_tickets: AtomicBool,
    fail_list_users: AtomicBool,
    fail_list_interactions: AtomicBool,
    reject_mutations: Option<Option<String>>,
}

impl RecordingService {
    fn with_data(tickets: Vec<Ticket>, usuarios: Vec<Usuario>) -> Self {
        Self {
            backend: Mutex::new(Backend {
                tickets,
                usuarios,
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    async fn record(&self, call: String) {
        self.calls.lock().await.push(call);
    }

    async fn calls(&self) -> Vec<String> {
        self.calls.lock().await.clone()
    }

    async fn clear_calls(&self) {
        self.calls.lock().await.clear();
    }

    fn set_failing(flag: &AtomicBool, failing: bool) {
        flag.store(failing, Ordering::SeqCst);
    }

    fn rejection(&self) -> AppResult<()> {
        match &self.reject_mutations {
            Some(detail) => Err(AppError::Api {
                status: StatusCode::BAD_REQUEST,
                detail: detail.clone(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl TicketService for RecordingService {
    async fn list_tickets(&self) -> AppResult<Vec<Ticket>> {
        self.record("GET /tickets".to_string()).await;
        if self.fail_list_tickets.load(Ordering::SeqCst) {
            return Err(AppError::Transport("connection refused".to_string()));
        }
        Ok(self.backend.lock().await.tickets.clone())
    }

    async fn get_ticket(&self, ticket_id: &str) -> AppResult<Ticket> {
        self.record(format!("GET /tickets/{ticket_id}")).await;
        self.backend
            .lock()
            .await
            .tickets
            .iter()
            .find(|t| t.id == ticket_id)
            .cloned()
            .ok_or(AppError::Api {
                status: StatusCode::NOT_FOUND,
                detail: Some("Ticket no encontrado".to_string()),
            })
    }

    async fn list_users(&self) -> AppResult<Vec<Usuario>> {
        self.record("GET /usuarios".to_string()).await;
        if self.fail_list_users.load(Ordering::SeqCst) {
            return Err(AppError::Api {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                detail: None,
            });
        }
        Ok(self.backend.lock().await.usuarios.clone())
    }

    async fn list_interactions(&self, ticket_id: &str) -> AppResult<Vec<Interaccion>> {
        self.record(format!("GET /tickets/{ticket_id}/interacciones"))
            .await;
        if self.fail_list_interactions.load(Ordering::SeqCst) {
            return Err(AppError::Transport("timed out".to_string()));
        }
        Ok(self
            .backend
            .lock()
            .await
            .interacciones
            .get(ticket_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_ticket(&self, draft: &TicketDraft) -> AppResult<Ticket> {
        let body = serde_json::to_string(draft).unwrap();
        self.record(format!("POST /tickets {body}")).await;
        self.rejection()?;

        let mut backend = self.backend.lock().await;
        backend.next_id += 1;
        let ticket = Ticket {
            id: format!("N{}", backend.next_id),
            usuario_id: draft.usuario_id.clone(),
            titulo: draft.titulo.clone(),
            descripcion: draft.descripcion.clone(),
            estado: Estado::Abierto,
            prioridad: draft.prioridad.clone(),
            fecha_creacion: Some("2024-01-15T10:30:00Z".to_string()),
            fecha_actualizacion: Some("2024-01-15T10:30:00Z".to_string()),
        };
        backend.tickets.insert(0, ticket.clone());
        Ok(ticket)
    }

    async fn update_status(
        &self,
        ticket_id: &str,
        estado: &Estado,
        usuario_id: &str,
    ) -> AppResult<StatusUpdate> {
        self.record(format!(
            "PATCH /tickets/{ticket_id}/estado?nuevo_estado={estado}&usuario_id={usuario_id}"
        ))
        .await;
        self.rejection()?;

        let mut backend = self.backend.lock().await;
        if let Some(ticket) = backend.tickets.iter_mut().find(|t| t.id == ticket_id) {
            ticket.estado = estado.clone();
        }
        let log = backend
            .interacciones
            .entry(ticket_id.to_string())
            .or_default();
        log.push(Interaccion {
            id: (log.len() + 1).to_string(),
            ticket_id: Some(ticket_id.to_string()),
            usuario_id: Some(usuario_id.to_string()),
            tipo: "cambio_estado".to_string(),
            contenido: format!("Estado actualizado a {estado}"),
            fecha_creacion: None,
        });
        Ok(StatusUpdate {
            mensaje: Some("Estado actualizado correctamente".to_string()),
            estado: Some(estado.to_string()),
        })
    }

    async fn create_interaction(&self, interaction: &NewInteraccion) -> AppResult<Interaccion> {
        self.record("POST /interacciones".to_string()).await;
        self.rejection()?;

        let mut backend = self.backend.lock().await;
        let log = backend
            .interacciones
            .entry(interaction.ticket_id.clone())
            .or_default();
        let created = Interaccion {
            id: (log.len() + 1).to_string(),
            ticket_id: Some(interaction.ticket_id.clone()),
            usuario_id: interaction.usuario_id.clone(),
            tipo: interaction.tipo.clone(),
            contenido: interaction.contenido.clone(),
            fecha_creacion: None,
        };
        log.push(created.clone());
        Ok(created)
    }

    async fn health(&self) -> AppResult<HealthReport> {
        self.record("GET /health".to_string()).await;
        Ok(HealthReport {
            status: "ok".to_string(),
            timestamp: None,
            services: Default::default(),
        })
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn ticket(id: &str, estado: Estado) -> Ticket {
    Ticket {
        id: id.to_string(),
        usuario_id: "u1".to_string(),
        titulo: format!("Ticket {id}"),
        descripcion: "Something broke".to_string(),
        estado,
        prioridad: Prioridad::Media,
        fecha_creacion: None,
        fecha_actualizacion: None,
    }
}

fn usuario(id: &str) -> Usuario {
    Usuario {
        id: id.to_string(),
        nombre: format!("User {id}"),
        email: format!("{id}@example.com"),
        rol: None,
        activo: Some(true),
    }
}

async fn loaded_dashboard(service: &Arc<RecordingService>) -> Dashboard {
    let mut dashboard = Dashboard::new(service.clone());
    dashboard.load().await;
    service.clear_calls().await;
    dashboard
}

fn fill_draft(dashboard: &mut Dashboard) {
    dashboard.toggle_form();
    dashboard.edit_draft(DraftField::Usuario("u1".to_string()));
    dashboard.edit_draft(DraftField::Titulo("Printer jam".to_string()));
    dashboard.edit_draft(DraftField::Descripcion("Paper stuck".to_string()));
    dashboard.edit_draft(DraftField::Prioridad(Prioridad::Alta));
}

// ============================================================================
// Loading
// ============================================================================

#[tokio::test]
async fn initial_load_fetches_tickets_then_users() {
    let service = Arc::new(RecordingService::with_data(
        vec![ticket("T1", Estado::Abierto)],
        vec![usuario("u1")],
    ));
    let mut dashboard = Dashboard::new(service.clone());
    dashboard.load().await;

    assert_eq!(service.calls().await, vec!["GET /tickets", "GET /usuarios"]);
    assert_eq!(dashboard.state().tickets.len(), 1);
    assert_eq!(dashboard.state().usuarios.len(), 1);
    assert!(!dashboard.state().loading);
}

#[tokio::test]
async fn failed_initial_ticket_load_clears_loading() {
    let service = Arc::new(RecordingService {
        fail_list_tickets: AtomicBool::new(true),
        ..RecordingService::with_data(vec![ticket("T1", Estado::Abierto)], vec![])
    });
    let mut dashboard = Dashboard::new(service.clone());
    dashboard.load_tickets().await;

    assert!(dashboard.state().tickets.is_empty());
    assert!(!dashboard.state().loading);
    assert!(dashboard.state().notices.is_empty());
}

#[tokio::test]
async fn failed_ticket_reload_keeps_previous_list() {
    let service = Arc::new(RecordingService::with_data(
        vec![ticket("T1", Estado::Abierto), ticket("T2", Estado::Resuelto)],
        vec![usuario("u1")],
    ));
    let mut dashboard = loaded_dashboard(&service).await;
    let before = dashboard.state().tickets.clone();

    RecordingService::set_failing(&service.fail_list_tickets, true);
    dashboard.load_tickets().await;

    assert_eq!(service.calls().await, vec!["GET /tickets"]);
    let state = dashboard.state();
    assert_eq!(state.tickets, before);
    assert!(!state.loading);
    assert!(state.notices.is_empty());
}

#[tokio::test]
async fn failed_user_reload_is_ignored() {
    let service = Arc::new(RecordingService::with_data(
        vec![ticket("T1", Estado::Abierto)],
        vec![usuario("u1"), usuario("u2")],
    ));
    let mut dashboard = loaded_dashboard(&service).await;

    RecordingService::set_failing(&service.fail_list_users, true);
    dashboard.load_users().await;

    assert_eq!(service.calls().await, vec!["GET /usuarios"]);
    let ids: Vec<&str> = dashboard
        .state()
        .usuarios
        .iter()
        .map(|u| u.id.as_str())
        .collect();
    assert_eq!(ids, vec!["u1", "u2"]);
    assert!(dashboard.state().notices.is_empty());
}

#[tokio::test]
async fn failed_initial_user_load_still_shows_tickets() {
    let service = Arc::new(RecordingService {
        fail_list_users: AtomicBool::new(true),
        ..RecordingService::with_data(vec![ticket("T1", Estado::Abierto)], vec![usuario("u1")])
    });
    let mut dashboard = Dashboard::new(service.clone());
    dashboard.load().await;

    assert_eq!(dashboard.state().tickets.len(), 1);
    assert!(dashboard.state().usuarios.is_empty());
    assert!(dashboard.state().notices.is_empty());
}

#[tokio::test]
async fn failed_interaction_load_shows_empty_log() {
    let service = Arc::new(RecordingService {
        fail_list_interactions: AtomicBool::new(true),
        ..RecordingService::with_data(vec![ticket("T1", Estado::Abierto)], vec![usuario("u1")])
    });
    let mut dashboard = loaded_dashboard(&service).await;
    dashboard.select_ticket("T1").await.unwrap();

    assert_eq!(
        dashboard.state().selected.as_ref().map(|t| t.id.as_str()),
        Some("T1")
    );
    assert!(dashboard.state().interacciones.is_empty());
}

#[tokio::test]
async fn selecting_unlisted_ticket_fetches_it() {
    let service = Arc::new(RecordingService::with_data(
        vec![ticket("T9", Estado::Resuelto)],
        vec![],
    ));
    let mut dashboard = Dashboard::new(service.clone());
    dashboard.select_ticket("T9").await.unwrap();

    assert_eq!(
        service.calls().await,
        vec!["GET /tickets/T9", "GET /tickets/T9/interacciones"]
    );

    let err = dashboard.select_ticket("missing").await.unwrap_err();
    assert_eq!(err.user_detail(), "Ticket no encontrado");
    let notices = dashboard.take_notices();
    assert_eq!(notices[0].message, "Error loading ticket: Ticket no encontrado");
}

// ============================================================================
// Creation
// ============================================================================

#[tokio::test]
async fn create_posts_draft_then_refetches() {
    let service = Arc::new(RecordingService::with_data(vec![], vec![usuario("u1")]));
    let mut dashboard = loaded_dashboard(&service).await;
    fill_draft(&mut dashboard);

    let created = dashboard.submit_draft().await.unwrap();

    assert_eq!(
        service.calls().await,
        vec![
            r#"POST /tickets {"usuario_id":"u1","titulo":"Printer jam","descripcion":"Paper stuck","prioridad":"alta"}"#,
            "GET /tickets",
        ]
    );
    let state = dashboard.state();
    assert_eq!(state.draft, TicketDraft::default());
    assert_eq!(state.draft.prioridad, Prioridad::Media);
    assert!(!state.show_form);
    assert_eq!(state.tickets[0].id, created.id);
    assert_eq!(state.tickets[0].estado, Estado::Abierto);
}

#[tokio::test]
async fn rejected_create_keeps_draft_and_reports_detail() {
    let service = Arc::new(RecordingService {
        reject_mutations: Some(Some("Usuario no existe".to_string())),
        ..RecordingService::with_data(vec![], vec![usuario("u1")])
    });
    let mut dashboard = loaded_dashboard(&service).await;
    fill_draft(&mut dashboard);

    assert!(dashboard.submit_draft().await.is_err());

    assert_eq!(service.calls().await.len(), 1);
    let state = dashboard.state();
    assert_eq!(state.draft.titulo, "Printer jam");
    assert!(state.show_form);
    assert_eq!(state.notices.len(), 1);
    assert_eq!(state.notices[0].level, NoticeLevel::Error);
    assert_eq!(
        state.notices[0].message,
        "Error creating ticket: Usuario no existe"
    );
}

#[tokio::test]
async fn rejected_create_without_detail_uses_generic_message() {
    let service = Arc::new(RecordingService {
        reject_mutations: Some(None),
        ..RecordingService::with_data(vec![], vec![usuario("u1")])
    });
    let mut dashboard = loaded_dashboard(&service).await;
    fill_draft(&mut dashboard);

    assert!(dashboard.submit_draft().await.is_err());
    assert_eq!(
        dashboard.take_notices()[0].message,
        "Error creating ticket: API responded with 400 Bad Request"
    );
}

#[tokio::test]
async fn incomplete_draft_is_not_submitted() {
    let service = Arc::new(RecordingService::with_data(vec![], vec![usuario("u1")]));
    let mut dashboard = loaded_dashboard(&service).await;
    dashboard.edit_draft(DraftField::Titulo("Only a title".to_string()));

    let err = dashboard.submit_draft().await.unwrap_err();
    assert!(matches!(err, AppError::Precondition(_)));
    assert!(service.calls().await.is_empty());
    assert_eq!(dashboard.state().draft.titulo, "Only a title");
}

// ============================================================================
// Status transitions
// ============================================================================

#[tokio::test]
async fn status_change_without_users_is_refused_locally() {
    let service = Arc::new(RecordingService::with_data(
        vec![ticket("T1", Estado::Abierto)],
        vec![],
    ));
    let mut dashboard = loaded_dashboard(&service).await;

    let err = dashboard
        .change_status("T1", Estado::Cerrado, None)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Precondition(_)));
    assert!(service.calls().await.is_empty());
    let notices = dashboard.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].message, NO_USERS_MESSAGE);
}

#[tokio::test]
async fn status_change_on_selected_ticket_refreshes_detail() {
    let service = Arc::new(RecordingService::with_data(
        vec![ticket("T1", Estado::Abierto), ticket("T2", Estado::Abierto)],
        vec![usuario("u1"), usuario("u2")],
    ));
    let mut dashboard = loaded_dashboard(&service).await;
    dashboard.select_ticket("T1").await.unwrap();
    service.clear_calls().await;

    dashboard
        .change_status("T1", Estado::EnProceso, Some("u1"))
        .await
        .unwrap();

    assert_eq!(
        service.calls().await,
        vec![
            "PATCH /tickets/T1/estado?nuevo_estado=en_proceso&usuario_id=u1",
            "GET /tickets",
            "GET /tickets/T1/interacciones",
        ]
    );
    let state = dashboard.state();
    assert_eq!(
        state.selected.as_ref().map(|t| t.estado.clone()),
        Some(Estado::EnProceso)
    );
    assert_eq!(state.tickets[0].estado, Estado::EnProceso);
    assert_eq!(state.interacciones.len(), 1);
    assert_eq!(state.interacciones[0].tipo, "cambio_estado");
}

#[tokio::test]
async fn status_change_on_other_ticket_skips_interactions() {
    let service = Arc::new(RecordingService::with_data(
        vec![ticket("T1", Estado::Abierto), ticket("T2", Estado::Abierto)],
        vec![usuario("u1")],
    ));
    let mut dashboard = loaded_dashboard(&service).await;
    dashboard.select_ticket("T1").await.unwrap();
    service.clear_calls().await;

    dashboard
        .change_status("T2", Estado::Resuelto, None)
        .await
        .unwrap();

    assert_eq!(
        service.calls().await,
        vec![
            "PATCH /tickets/T2/estado?nuevo_estado=resuelto&usuario_id=u1",
            "GET /tickets",
        ]
    );
    assert_eq!(
        dashboard.state().selected.as_ref().map(|t| t.estado.clone()),
        Some(Estado::Abierto)
    );
    let notices = dashboard.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Warning);
    assert!(notices[0].message.contains("User u1 (u1@example.com)"));
}

#[tokio::test]
async fn status_change_to_current_estado_is_refused_locally() {
    let service = Arc::new(RecordingService::with_data(
        vec![ticket("T1", Estado::Abierto), ticket("T2", Estado::EnProceso)],
        vec![usuario("u1")],
    ));
    let mut dashboard = loaded_dashboard(&service).await;
    dashboard.select_ticket("T1").await.unwrap();
    service.clear_calls().await;

    let err = dashboard
        .change_status("T1", Estado::Abierto, Some("u1"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Precondition(_)));

    // Unselected tickets are checked against the loaded list.
    assert!(
        dashboard
            .change_status("T2", Estado::EnProceso, None)
            .await
            .is_err()
    );

    assert!(service.calls().await.is_empty());
    assert!(service.backend.lock().await.interacciones.is_empty());
    let notices = dashboard.take_notices();
    assert_eq!(notices.len(), 2);
    assert_eq!(notices[0].level, NoticeLevel::Error);
    assert_eq!(notices[0].message, "ticket T1 is already abierto");
    assert_eq!(notices[1].message, "ticket T2 is already en proceso");
    assert_eq!(
        dashboard.state().selected.as_ref().map(|t| t.estado.clone()),
        Some(Estado::Abierto)
    );
}

#[tokio::test]
async fn rejected_status_change_reports_detail() {
    let service = Arc::new(RecordingService {
        reject_mutations: Some(Some("Transición no permitida".to_string())),
        ..RecordingService::with_data(vec![ticket("T1", Estado::Cerrado)], vec![usuario("u1")])
    });
    let mut dashboard = loaded_dashboard(&service).await;

    assert!(
        dashboard
            .change_status("T1", Estado::Abierto, Some("u1"))
            .await
            .is_err()
    );
    assert_eq!(service.calls().await.len(), 1);
    assert_eq!(
        dashboard.take_notices()[0].message,
        "Error updating status: Transición no permitida"
    );
}

#[test]
fn actor_resolution() {
    let usuarios = vec![usuario("u1"), usuario("u2")];
    assert_eq!(resolve_actor(&usuarios, None).unwrap().id, "u1");
    assert_eq!(resolve_actor(&usuarios, Some("u2")).unwrap().id, "u2");
    assert_eq!(resolve_actor(&usuarios, Some("  ")).unwrap().id, "u1");
    assert!(matches!(
        resolve_actor(&usuarios, Some("ghost")),
        Err(AppError::Precondition(_))
    ));
    assert_eq!(
        resolve_actor(&[], Some("u1")).unwrap_err().to_string(),
        NO_USERS_MESSAGE
    );
}

// ============================================================================
// Comments and derived views
// ============================================================================

#[tokio::test]
async fn comment_on_open_ticket_reloads_log() {
    let service = Arc::new(RecordingService::with_data(
        vec![ticket("T1", Estado::Abierto)],
        vec![usuario("u1")],
    ));
    let mut dashboard = loaded_dashboard(&service).await;
    dashboard.select_ticket("T1").await.unwrap();
    service.clear_calls().await;

    let created = dashboard
        .add_comment("T1", "Reinicié la impresora", Some("u1"))
        .await
        .unwrap();

    assert_eq!(created.tipo, "comentario");
    assert_eq!(
        service.calls().await,
        vec!["POST /interacciones", "GET /tickets/T1/interacciones"]
    );
    assert_eq!(dashboard.state().interacciones.len(), 1);
}

#[tokio::test]
async fn empty_comment_is_refused() {
    let service = Arc::new(RecordingService::with_data(vec![], vec![]));
    let mut dashboard = Dashboard::new(service.clone());

    assert!(dashboard.add_comment("T1", "   ", None).await.is_err());
    assert!(service.calls().await.is_empty());
    assert_eq!(dashboard.take_notices().len(), 1);
}

#[tokio::test]
async fn visible_tickets_follow_filter() {
    let service = Arc::new(RecordingService::with_data(
        vec![
            ticket("T1", Estado::Abierto),
            ticket("T2", Estado::Cerrado),
            ticket("T3", Estado::Abierto),
        ],
        vec![],
    ));
    let mut dashboard = loaded_dashboard(&service).await;

    dashboard.set_filter(StatusFilter::Estado(Estado::Abierto));
    let visible: Vec<&str> = dashboard
        .visible_tickets()
        .iter()
        .map(|t| t.id.as_str())
        .collect();
    assert_eq!(visible, vec!["T1", "T3"]);

    let stats = dashboard.stats();
    assert_eq!((stats.total, stats.abiertos), (3, 2));
    assert!(service.calls().await.is_empty());
}
