use std::process::ExitCode;

use crate::cmd::report_notices;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::render::render_users;

pub async fn run_list(ctx: &AppContext) -> AppResult<ExitCode> {
    let mut dashboard = ctx.dashboard();
    dashboard.load_users().await;
    print!("{}", render_users(&dashboard.state().usuarios));
    Ok(report_notices(&mut dashboard))
}
