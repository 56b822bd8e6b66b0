use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use courierdesk::application::dto::LoginRequest;
use courierdesk::application::use_cases::LoginUseCase;
use courierdesk::domain::entities::ActivityEvent;
use courierdesk::domain::ports::{AuthPort, CredentialStorePort};
use courierdesk::infrastructure::config::{ApiConfig, AppConfig, CliArgs, Command};
use courierdesk::infrastructure::feed::{FeedClient, FeedClientConfig, FeedEvent};
use courierdesk::infrastructure::http::{ApiClient, TracingSessionEvents};
use courierdesk::infrastructure::storage::KeyringCredentialStore;

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = config.effective_log_path() {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry().with(filter).init();
    }

    Ok(())
}

fn feed_client(
    config: &AppConfig,
    api_config: ApiConfig,
    store: Arc<dyn CredentialStorePort>,
    api_client: &ApiClient,
) -> FeedClient {
    FeedClient::new(
        FeedClientConfig::from(&config.feed),
        api_config,
        store,
        api_client.refresh_coordinator(),
    )
}

fn print_activity(event: &ActivityEvent) {
    println!(
        "[{}] {}: {}",
        event.timestamp.format("%H:%M:%S"),
        event.title,
        event.description
    );
}

async fn tail(feed: FeedClient) -> Result<()> {
    let mut events = feed.start()?;

    loop {
        tokio::select! {
            maybe_event = events.recv() => match maybe_event {
                Some(FeedEvent::Connected { route }) => println!("Connected via {route}"),
                Some(FeedEvent::Activity(event)) => print_activity(&event),
                Some(FeedEvent::Reconnecting { attempt, delay }) => {
                    println!("Reconnecting (attempt {attempt}) in {delay:?}");
                }
                Some(FeedEvent::Degraded) => {
                    println!("Feed unavailable, showing recent sample data:");
                    for event in feed.handle().activities() {
                        print_activity(&event);
                    }
                }
                Some(FeedEvent::Disconnected { code, reason }) => {
                    println!("Disconnected ({code}): {reason}");
                }
                Some(FeedEvent::Error { message }) => eprintln!("Feed error: {message}"),
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                feed.disconnect();
                break;
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    color_eyre::install()?;

    let args = CliArgs::parse();
    let mut config = AppConfig::load(args.config.as_ref());
    config.merge_with_args(&args);

    init_logging(&config)?;
    info!(version = courierdesk::VERSION, "Starting courierdesk");

    let api_config = ApiConfig::new(config.effective_api_url());
    let store: Arc<dyn CredentialStorePort> = Arc::new(KeyringCredentialStore::new());
    let api_client = Arc::new(ApiClient::new(
        api_config.clone(),
        store.clone(),
        Arc::new(TracingSessionEvents),
    )?);

    match args.command.unwrap_or(Command::Tail) {
        Command::Login { email, password } => {
            let use_case =
                LoginUseCase::new(api_client.clone() as Arc<dyn AuthPort>, store.clone());
            let outcome = use_case.execute(LoginRequest::new(email, password)).await?;
            println!("Logged in as {}", outcome.user.display_name());
            if !outcome.credential_persisted {
                println!("Warning: the credential could not be persisted; login again next run");
            }
        }
        Command::Logout => {
            let use_case =
                LoginUseCase::new(api_client.clone() as Arc<dyn AuthPort>, store.clone());
            use_case.logout().await?;
            println!("Logged out");
        }
        Command::Tail => {
            let feed = feed_client(&config, api_config, store, &api_client);
            tail(feed).await?;
        }
        Command::Probe => {
            let feed = feed_client(&config, api_config, store, &api_client);
            for (route, reachable) in feed.probe_endpoints().await {
                let verdict = if reachable { "reachable" } else { "unreachable" };
                println!("{route}: {verdict}");
            }
        }
    }

    Ok(())
}
