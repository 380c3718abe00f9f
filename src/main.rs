//! taskdeck CLI - serve the task API.

use clap::Parser;
use std::process;
use std::sync::Arc;
use taskdeck::ai::{AzureOpenAiClient, TaskAugmenter};
use taskdeck::cli::{Cli, Commands, ServeArgs};
use taskdeck::commands::TaskService;
use taskdeck::server::{self, AppState};
use taskdeck::storage::JsonFileStore;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    // A missing .env file is fine; the environment may already be set.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let result = match cli.command {
        Commands::Serve(args) => serve(args),
    };

    if let Err(e) = result {
        tracing::error!("{}", e);
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn serve(args: ServeArgs) -> Result<(), Box<dyn std::error::Error>> {
    // Fail before binding anything if the model settings are incomplete.
    let model_config = args.model_config().map_err(taskdeck::Error::from)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        commit = env!("TASKDECK_GIT_COMMIT"),
        built = env!("TASKDECK_BUILD_TIMESTAMP"),
        "taskdeck starting"
    );
    tracing::info!(
        tasks_file = %args.tasks_file.display(),
        endpoint = %model_config.endpoint(),
        deployment = %model_config.deployment(),
        api_version = %model_config.api_version(),
        "configuration loaded"
    );

    let model = Arc::new(AzureOpenAiClient::new(model_config));
    let state = AppState::new(
        TaskService::new(JsonFileStore::new(args.tasks_file)),
        TaskAugmenter::new(model),
    );

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server::start_server(state, &args.host, args.port))
}
