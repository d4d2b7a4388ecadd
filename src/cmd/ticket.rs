use std::process::ExitCode;

use crate::cmd::report_notices;
use crate::context::AppContext;
use crate::domain::ticket::{Estado, Prioridad, StatusFilter};
use crate::error::AppResult;
use crate::render::{render_ticket_detail, render_ticket_list};
use crate::workflow::Dashboard;
use crate::workflow::state::DraftField;

#[derive(Debug, Clone)]
pub struct CreateTicketArgs {
    pub usuario_id: String,
    pub titulo: String,
    pub descripcion: String,
    pub prioridad: Prioridad,
}

pub async fn run_list(ctx: &AppContext, filter: StatusFilter) -> AppResult<ExitCode> {
    let mut dashboard = ctx.dashboard();
    dashboard.load_tickets().await;
    dashboard.set_filter(filter);

    print!(
        "{}",
        render_ticket_list(
            &dashboard.visible_tickets(),
            dashboard.stats(),
            &dashboard.state().filter
        )
    );
    Ok(report_notices(&mut dashboard))
}

pub async fn run_show(ctx: &AppContext, ticket_id: &str) -> AppResult<ExitCode> {
    let mut dashboard = ctx.dashboard();
    dashboard.load_tickets().await;
    if dashboard.select_ticket(ticket_id).await.is_ok() {
        print_detail(&dashboard);
    }
    Ok(report_notices(&mut dashboard))
}

pub async fn run_create(ctx: &AppContext, args: CreateTicketArgs) -> AppResult<ExitCode> {
    let mut dashboard = ctx.dashboard();
    dashboard.toggle_form();
    dashboard.edit_draft(DraftField::Usuario(args.usuario_id));
    dashboard.edit_draft(DraftField::Titulo(args.titulo));
    dashboard.edit_draft(DraftField::Descripcion(args.descripcion));
    dashboard.edit_draft(DraftField::Prioridad(args.prioridad));

    if let Ok(ticket) = dashboard.submit_draft().await {
        println!("Ticket {} created.", ticket.id);
    }
    Ok(report_notices(&mut dashboard))
}

pub async fn run_status(
    ctx: &AppContext,
    ticket_id: &str,
    estado: Estado,
    actor: Option<&str>,
) -> AppResult<ExitCode> {
    let mut dashboard = ctx.dashboard();
    dashboard.load().await;
    if dashboard.select_ticket(ticket_id).await.is_ok()
        && dashboard
            .change_status(ticket_id, estado, actor)
            .await
            .is_ok()
    {
        print_detail(&dashboard);
    }
    Ok(report_notices(&mut dashboard))
}

pub async fn run_comment(
    ctx: &AppContext,
    ticket_id: &str,
    contenido: &str,
    actor: Option<&str>,
) -> AppResult<ExitCode> {
    let mut dashboard = ctx.dashboard();
    if actor.is_some() {
        dashboard.load_users().await;
    }
    dashboard.load_tickets().await;
    if dashboard.select_ticket(ticket_id).await.is_ok()
        && dashboard
            .add_comment(ticket_id, contenido, actor)
            .await
            .is_ok()
    {
        print_detail(&dashboard);
    }
    Ok(report_notices(&mut dashboard))
}

fn print_detail(dashboard: &Dashboard) {
    let state = dashboard.state();
    if let Some(ticket) = &state.selected {
        print!("{}", render_ticket_detail(ticket, &state.interacciones));
    }
}
