use std::process::ExitCode;

use crate::context::AppContext;
use crate::error::AppResult;
use crate::render::render_health;

pub async fn run(ctx: &AppContext) -> AppResult<ExitCode> {
    let report = ctx.tickets.health().await?;
    print!("{}", render_health(&report));
    tracing::debug!(api_url = %ctx.config.api_url, status = %report.status, "health check");
    Ok(if report.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
