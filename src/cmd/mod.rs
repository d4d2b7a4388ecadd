pub mod health;
pub mod ticket;
pub mod user;

use std::process::ExitCode;

use owo_colors::{Stream, Style};

use crate::render::paint;
use crate::workflow::Dashboard;
use crate::workflow::state::NoticeLevel;

/// Prints pending notices to stderr. Any error notice turns the command's
/// exit status into a failure.
pub fn report_notices(dashboard: &mut Dashboard) -> ExitCode {
    let mut failed = false;
    for notice in dashboard.take_notices() {
        match notice.level {
            NoticeLevel::Warning => {
                let label = paint("warning:", Style::new().yellow().bold(), Stream::Stderr);
                eprintln!("{label} {}", notice.message);
            }
            NoticeLevel::Error => {
                failed = true;
                let label = paint("error:", Style::new().red().bold(), Stream::Stderr);
                eprintln!("{label} {}", notice.message);
            }
        }
    }
    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
