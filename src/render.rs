use std::fmt::{self, Write as _};

use owo_colors::{OwoColorize, Stream, Style};

use crate::domain::interaccion::Interaccion;
use crate::domain::presentation::{
    NEUTRAL_COLOR, TicketStats, available_transitions, estado_color, estado_label, format_date,
    prioridad_color, truncate_description,
};
use crate::domain::ticket::{StatusFilter, Ticket};
use crate::domain::usuario::Usuario;
use crate::services::HealthReport;

/// Renders `value` with `style` when `stream` is a color-capable terminal,
/// plain otherwise.
pub fn paint(value: impl fmt::Display, style: Style, stream: Stream) -> String {
    value
        .if_supports_color(stream, |value| value.style(style))
        .to_string()
}

fn styled(value: impl fmt::Display, style: Style) -> String {
    paint(value, style, Stream::Stdout)
}

/// Colors `text` with a `#rrggbb` value; malformed values use the neutral color.
pub fn badge(text: &str, hex: &str) -> String {
    let (r, g, b) = parse_hex(hex)
        .or_else(|| parse_hex(NEUTRAL_COLOR))
        .unwrap_or((107, 114, 128));
    styled(format!("[{text}]"), Style::new().truecolor(r, g, b))
}

fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
    Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

pub fn render_ticket_list(tickets: &[&Ticket], stats: TicketStats, filter: &StatusFilter) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} total, {} open",
        styled(stats.total, Style::new().bold()),
        styled(stats.abiertos, Style::new().bold())
    );

    if tickets.is_empty() {
        match filter {
            StatusFilter::Todos => out.push_str("No tickets yet.\n"),
            other => {
                let _ = writeln!(out, "No tickets with status \"{}\".", other.as_str());
            }
        }
        return out;
    }

    for ticket in tickets {
        let _ = writeln!(
            out,
            "\n{} {} {}",
            styled(&ticket.id, Style::new().dimmed()),
            styled(&ticket.titulo, Style::new().bold()),
            badge(
                &ticket.prioridad.as_str().to_uppercase(),
                prioridad_color(&ticket.prioridad)
            )
        );
        let _ = writeln!(out, "  {}", truncate_description(&ticket.descripcion));
        let _ = writeln!(
            out,
            "  {} {}",
            badge(&estado_label(&ticket.estado), estado_color(&ticket.estado)),
            styled(
                format_date(ticket.fecha_creacion.as_deref()),
                Style::new().dimmed()
            )
        );
    }
    out
}

pub fn render_ticket_detail(ticket: &Ticket, interacciones: &[Interaccion]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} ({})",
        styled(&ticket.titulo, Style::new().bold()),
        styled(&ticket.id, Style::new().dimmed())
    );
    let _ = writeln!(out, "{}\n", ticket.descripcion);
    let _ = writeln!(
        out,
        "Status:   {}",
        badge(&estado_label(&ticket.estado), estado_color(&ticket.estado))
    );
    let _ = writeln!(
        out,
        "Priority: {}",
        badge(ticket.prioridad.as_str(), prioridad_color(&ticket.prioridad))
    );
    let _ = writeln!(
        out,
        "Created:  {}",
        format_date(ticket.fecha_creacion.as_deref())
    );
    let _ = writeln!(
        out,
        "Updated:  {}",
        format_date(ticket.fecha_actualizacion.as_deref())
    );

    let targets = available_transitions(&ticket.estado)
        .into_iter()
        .filter(|(_, enabled)| *enabled)
        .map(|(estado, _)| estado.as_str().to_string())
        .collect::<Vec<_>>();
    let _ = writeln!(out, "Move to:  {}", targets.join(", "));

    let _ = writeln!(out, "\nInteractions ({})", interacciones.len());
    if interacciones.is_empty() {
        out.push_str("  No interactions yet.\n");
    }
    for entry in interacciones {
        let _ = writeln!(
            out,
            "  {} {} {}",
            styled(
                format_date(entry.fecha_creacion.as_deref()),
                Style::new().dimmed()
            ),
            styled(entry.tipo.replace('_', " "), Style::new().cyan()),
            entry.contenido
        );
    }
    out
}

pub fn render_users(usuarios: &[Usuario]) -> String {
    if usuarios.is_empty() {
        return "No users.\n".to_string();
    }
    let mut out = String::new();
    for usuario in usuarios {
        let _ = write!(
            out,
            "{}  {}",
            styled(&usuario.id, Style::new().dimmed()),
            usuario.display_name()
        );
        if let Some(rol) = &usuario.rol {
            let _ = write!(out, "  {rol}");
        }
        if usuario.activo == Some(false) {
            let _ = write!(out, "  {}", styled("inactive", Style::new().dimmed()));
        }
        out.push('\n');
    }
    out
}

pub fn render_health(report: &HealthReport) -> String {
    let mut out = String::new();
    let status = if report.is_ok() {
        styled(&report.status, Style::new().green())
    } else {
        styled(&report.status, Style::new().yellow())
    };
    let _ = writeln!(out, "API status: {status}");
    if report.timestamp.is_some() {
        let _ = writeln!(out, "Checked at: {}", format_date(report.timestamp.as_deref()));
    }
    for (service, state) in &report.services {
        let _ = writeln!(out, "  {service}: {state}");
    }
    out
}
