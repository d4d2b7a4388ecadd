//! Pure derivations from dashboard state: filtering, color badges, dates and
//! list-view truncation. Nothing in here performs I/O or can fail.

use jiff::Timestamp;
use jiff::civil::DateTime;
use jiff::tz::TimeZone;

use crate::domain::ticket::{Estado, Prioridad, StatusFilter, Ticket};

pub const NEUTRAL_COLOR: &str = "#6b7280";
pub const NOT_AVAILABLE: &str = "N/A";
pub const DESCRIPTION_PREVIEW_CHARS: usize = 120;
const ELLIPSIS: &str = "...";

const MONTHS_ES: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sept", "oct", "nov", "dic",
];

/// Tickets matching `filter`, in the order the backend returned them.
pub fn filter_tickets<'a>(tickets: &'a [Ticket], filter: &StatusFilter) -> Vec<&'a Ticket> {
    tickets
        .iter()
        .filter(|ticket| filter.matches(&ticket.estado))
        .collect()
}

pub fn estado_color(estado: &Estado) -> &'static str {
    match estado {
        Estado::Abierto => "#3b82f6",
        Estado::EnProceso => "#f59e0b",
        Estado::Resuelto => "#10b981",
        Estado::Cerrado => NEUTRAL_COLOR,
        Estado::Other(_) => NEUTRAL_COLOR,
    }
}

pub fn prioridad_color(prioridad: &Prioridad) -> &'static str {
    match prioridad {
        Prioridad::Baja => NEUTRAL_COLOR,
        Prioridad::Media => "#3b82f6",
        Prioridad::Alta => "#f59e0b",
        Prioridad::Critica => "#ef4444",
        Prioridad::Other(_) => NEUTRAL_COLOR,
    }
}

/// `en_proceso` -> `en proceso`.
pub fn estado_label(estado: &Estado) -> String {
    estado.as_str().replace('_', " ")
}

/// Formats a backend timestamp in the local time zone, e.g. `15 ene 2024, 10:30`.
pub fn format_date(value: Option<&str>) -> String {
    format_date_in(value, &TimeZone::system())
}

/// Same as [`format_date`] with an explicit zone. Missing values render as
/// `N/A`; values that do not parse are shown as received.
pub fn format_date_in(value: Option<&str>, tz: &TimeZone) -> String {
    let Some(raw) = value.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return NOT_AVAILABLE.to_string();
    };

    match parse_timestamp(raw, tz) {
        Some(timestamp) => {
            let local = timestamp.to_zoned(tz.clone());
            let month = MONTHS_ES[(local.month() - 1) as usize];
            format!(
                "{} {} {}, {:02}:{:02}",
                local.day(),
                month,
                local.year(),
                local.hour(),
                local.minute()
            )
        }
        None => raw.to_string(),
    }
}

fn parse_timestamp(raw: &str, tz: &TimeZone) -> Option<Timestamp> {
    if let Ok(timestamp) = raw.parse::<Timestamp>() {
        return Some(timestamp);
    }
    // Offset-less values are wall-clock times in the viewer's zone.
    let civil = raw.parse::<DateTime>().ok()?;
    civil
        .to_zoned(tz.clone())
        .ok()
        .map(|zoned| zoned.timestamp())
}

/// Caps a description for the list view at 120 characters plus `...`.
pub fn truncate_description(description: &str) -> String {
    match description.char_indices().nth(DESCRIPTION_PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &description[..cut]),
        None => description.to_string(),
    }
}

/// Every state is offered as a target; only the current one is disabled.
pub fn available_transitions(current: &Estado) -> Vec<(Estado, bool)> {
    Estado::ALL
        .into_iter()
        .map(|estado| {
            let enabled = &estado != current;
            (estado, enabled)
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TicketStats {
    pub total: usize,
    pub abiertos: usize,
}

impl TicketStats {
    pub fn from_tickets(tickets: &[Ticket]) -> Self {
        Self {
            total: tickets.len(),
            abiertos: tickets
                .iter()
                .filter(|ticket| ticket.estado == Estado::Abierto)
                .count(),
        }
    }
}
