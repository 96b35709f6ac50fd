//! The `surveystat serve` command.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use surveystat_core::traits::SurveyRepository;

pub async fn execute(
    bind: Option<String>,
    data: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let (config, repository) = super::open_repository(data, config_path.as_deref())?;

    let bind = bind.unwrap_or(config.bind);
    let addr: SocketAddr = bind
        .parse()
        .with_context(|| format!("invalid bind address: {bind}"))?;

    let repository: Arc<dyn SurveyRepository> = Arc::from(repository);
    eprintln!("Serving statistics on http://{addr}");
    eprintln!("  GET /health");
    eprintln!("  GET /surveys?status=<draft|active|closed>");
    eprintln!("  GET /surveys/:id/statistics");

    surveystat_server::serve(addr, repository).await
}
