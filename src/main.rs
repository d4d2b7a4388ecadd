mod cmd;
mod config;
mod context;
mod domain;
mod error;
mod infra;
mod render;
mod services;
mod workflow;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::cmd::ticket::CreateTicketArgs;
use crate::cmd::{health, ticket, user};
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::domain::ticket::{Estado, Prioridad, StatusFilter};
use crate::error::AppResult;

#[derive(Parser)]
#[command(name = "helpdesk", author, version, about = "Support ticket dashboard")]
struct Cli {
    /// Ticket API base URL (defaults to $HELPDESK_API_URL, then http://localhost:8000).
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List tickets, optionally filtered by status.
    List {
        /// todos, abierto, en_proceso, resuelto or cerrado.
        #[arg(short, long, default_value = "todos")]
        estado: StatusFilter,
    },
    /// Show a ticket with its interaction log.
    Show { ticket_id: String },
    /// Create a ticket.
    Create {
        #[arg(short, long)]
        usuario: String,
        #[arg(short, long)]
        titulo: String,
        #[arg(short, long)]
        descripcion: String,
        #[arg(short, long, default_value = "media", value_parser = parse_prioridad)]
        prioridad: Prioridad,
    },
    /// Move a ticket to another status.
    Status {
        ticket_id: String,
        #[arg(value_parser = parse_estado)]
        estado: Estado,
        /// Acting user id; defaults to the first user the API lists.
        #[arg(short, long)]
        usuario: Option<String>,
    },
    /// Add a comment to a ticket's interaction log.
    Comment {
        ticket_id: String,
        contenido: String,
        #[arg(short, long)]
        usuario: Option<String>,
    },
    /// List users.
    Users,
    /// Check the API's health endpoint.
    Health,
}

fn parse_estado(value: &str) -> Result<Estado, String> {
    Estado::parse(value).ok_or_else(|| {
        let expected = Estado::ALL.map(|estado| estado.to_string()).join(", ");
        format!("unknown status '{value}', expected one of: {expected}")
    })
}

fn parse_prioridad(value: &str) -> Result<Prioridad, String> {
    Prioridad::parse(value).ok_or_else(|| {
        let expected = Prioridad::ALL.map(|prioridad| prioridad.to_string()).join(", ");
        format!("unknown priority '{value}', expected one of: {expected}")
    })
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run().await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("Error: {error}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> AppResult<ExitCode> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.api_url)?;
    tracing::debug!(api_url = %config.api_url, "using ticket API");
    let ctx = AppContext::connect(config)?;

    match cli.command {
        Commands::List { estado } => ticket::run_list(&ctx, estado).await,
        Commands::Show { ticket_id } => ticket::run_show(&ctx, &ticket_id).await,
        Commands::Create {
            usuario,
            titulo,
            descripcion,
            prioridad,
        } => {
            let args = CreateTicketArgs {
                usuario_id: usuario,
                titulo,
                descripcion,
                prioridad,
            };
            ticket::run_create(&ctx, args).await
        }
        Commands::Status {
            ticket_id,
            estado,
            usuario,
        } => ticket::run_status(&ctx, &ticket_id, estado, usuario.as_deref()).await,
        Commands::Comment {
            ticket_id,
            contenido,
            usuario,
        } => ticket::run_comment(&ctx, &ticket_id, &contenido, usuario.as_deref()).await,
        Commands::Users => user::run_list(&ctx).await,
        Commands::Health => health::run(&ctx).await,
    }
}
