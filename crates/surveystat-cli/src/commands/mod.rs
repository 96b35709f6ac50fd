pub mod init;
pub mod list;
pub mod serve;
pub mod stats;
pub mod validate;

use std::path::{Path, PathBuf};

use anyhow::Result;

use surveystat_core::traits::SurveyRepository;
use surveystat_store::config::{create_repository, load_config_from, SurveystatConfig};
use surveystat_store::json::JsonRepository;

/// Load config and open the repository it names. An explicit `--data` path
/// wins over whatever store the config selects.
pub fn open_repository(
    data: Option<PathBuf>,
    config_path: Option<&Path>,
) -> Result<(SurveystatConfig, Box<dyn SurveyRepository>)> {
    let config = load_config_from(config_path)?;
    let repository: Box<dyn SurveyRepository> = match data {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("dataset not found: {}", path.display());
            }
            Box::new(JsonRepository::new(path))
        }
        None => create_repository(&config.store)?,
    };
    tracing::debug!(backend = repository.name(), "opened repository");
    Ok((config, repository))
}
