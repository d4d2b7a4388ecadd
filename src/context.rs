use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::AppResult;
use crate::infra::http::HttpTicketClient;
use crate::services::TicketService;
use crate::workflow::Dashboard;

#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub tickets: Arc<dyn TicketService>,
}

impl AppContext {
    pub fn new(config: AppConfig, tickets: Arc<dyn TicketService>) -> Self {
        Self { config, tickets }
    }

    /// Context backed by the HTTP API at `config.api_url`.
    pub fn connect(config: AppConfig) -> AppResult<Self> {
        let client = HttpTicketClient::new(&config.api_url, config.request_timeout)?;
        Ok(Self::new(config, Arc::new(client)))
    }

    pub fn dashboard(&self) -> Dashboard {
        Dashboard::new(self.tickets.clone())
    }
}
