//! CLI argument definitions for taskdeck.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{
    API_KEY_ENV, API_VERSION_ENV, ConfigError, DEPLOYMENT_ENV, ENDPOINT_ENV, ModelConfig,
};

/// taskdeck - A task-tracking HTTP service with LLM-assisted augmentation.
#[derive(Parser, Debug)]
#[command(name = "taskdeck")]
#[command(author, version, about = "A task-tracking HTTP service with LLM-assisted augmentation", long_about = None)]
pub struct Cli {
    /// Emit logs as JSON lines instead of human-readable text
    #[arg(long = "log-json", global = true, env = "TASKDECK_LOG_JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    ///
    /// Requires the four Azure OpenAI settings; the server refuses to start
    /// if any of them is missing.
    Serve(ServeArgs),
}

/// Options for `taskdeck serve`
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Host address to bind to (use 0.0.0.0 for network access)
    #[arg(long, env = "TASKDECK_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "TASKDECK_PORT", default_value_t = crate::server::DEFAULT_PORT)]
    pub port: u16,

    /// JSON file holding the task collection
    #[arg(long, env = "TASKDECK_TASKS_FILE", default_value = crate::storage::DEFAULT_TASKS_FILE)]
    pub tasks_file: PathBuf,

    /// Azure OpenAI API key
    #[arg(long, env = API_KEY_ENV, hide_env_values = true)]
    pub azure_api_key: Option<String>,

    /// Azure OpenAI resource endpoint
    #[arg(long, env = ENDPOINT_ENV)]
    pub azure_endpoint: Option<String>,

    /// Azure OpenAI chat model deployment name
    #[arg(long, env = DEPLOYMENT_ENV)]
    pub azure_deployment: Option<String>,

    /// Azure OpenAI REST API version
    #[arg(long, env = API_VERSION_ENV)]
    pub azure_api_version: Option<String>,
}

impl ServeArgs {
    /// Assemble the model configuration, failing on any missing value.
    pub fn model_config(&self) -> Result<ModelConfig, ConfigError> {
        ModelConfig::new(
            self.azure_endpoint.clone(),
            self.azure_api_key.clone(),
            self.azure_deployment.clone(),
            self.azure_api_version.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_defaults() {
        let cli = Cli::try_parse_from([
            "taskdeck",
            "serve",
            "--azure-api-key",
            "k",
            "--azure-endpoint",
            "https://res",
            "--azure-deployment",
            "d",
            "--azure-api-version",
            "v",
        ])
        .unwrap();

        let Commands::Serve(args) = cli.command;
        assert_eq!(args.port, 5000);
        assert_eq!(args.tasks_file, PathBuf::from("tasks.json"));
        assert!(args.model_config().is_ok());
    }

    #[test]
    fn test_serve_custom_port_and_file() {
        let cli = Cli::try_parse_from([
            "taskdeck",
            "serve",
            "--port",
            "8080",
            "--tasks-file",
            "/tmp/t.json",
        ])
        .unwrap();

        let Commands::Serve(args) = cli.command;
        assert_eq!(args.port, 8080);
        assert_eq!(args.tasks_file, PathBuf::from("/tmp/t.json"));
    }
}
