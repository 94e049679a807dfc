use std::sync::Arc;

use crate::{
    clients::{
        GradingClient, HttpGradingClient, LogNotifier, Notifier, RouteHandoff, SubmitConfirmation,
    },
    config::Config,
    errors::AppResult,
};

/// Collaborators a quiz session is wired to.
#[derive(Clone)]
pub struct AppState {
    pub grading_client: Arc<dyn GradingClient>,
    pub notifier: Arc<dyn Notifier>,
    pub routes: Arc<dyn RouteHandoff>,
    pub confirmation: Arc<dyn SubmitConfirmation>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(
        config: Config,
        routes: Arc<dyn RouteHandoff>,
        confirmation: Arc<dyn SubmitConfirmation>,
    ) -> AppResult<Self> {
        config.validate()?;

        let grading_client = Arc::new(HttpGradingClient::new(&config)?);

        Ok(Self {
            grading_client,
            notifier: Arc::new(LogNotifier),
            routes,
            confirmation,
            config: Arc::new(config),
        })
    }

    pub fn with_collaborators(
        config: Config,
        grading_client: Arc<dyn GradingClient>,
        notifier: Arc<dyn Notifier>,
        routes: Arc<dyn RouteHandoff>,
        confirmation: Arc<dyn SubmitConfirmation>,
    ) -> Self {
        Self {
            grading_client,
            notifier,
            routes,
            confirmation,
            config: Arc::new(config),
        }
    }
}
