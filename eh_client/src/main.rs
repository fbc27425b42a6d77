//! Terminal client for the event hub API.
//!
//! Browses events with live capacity, registers for them, creates events and
//! manages the profile page, either as a line-oriented shell or as a TUI.

use anyhow::{Context, Result};
use eh_client::{
    cli::Shell,
    config::{ClientConfig, ConfigOverrides},
    logging,
    traced_api::TracedApi,
    tui_app::TuiApp,
};
use event_hub::{FileStore, HttpEventsApi, KeyValueStore, MemoryStore, SessionStore};
use pico_args::Arguments;
use std::{path::PathBuf, sync::Arc};
use tokio::io::BufReader;

const HELP: &str = "\
Browse and register for events

USAGE:
  eh_client [OPTIONS]

OPTIONS:
  --api URL             API base URL  [default: env EVENT_HUB_API_URL or http://127.0.0.1:8000/api]
  --storage PATH        Session store file  [default: env EVENT_HUB_STORAGE or ~/.event_hub/storage.json]

FLAGS:
  --ephemeral           Keep the session in memory only
  --tui                 Use TUI (Terminal UI) mode [default: false]
  -h, --help            Print help information

ENVIRONMENT:
  EVENT_HUB_API_URL             API base URL
  EVENT_HUB_STORAGE             Session store file
  EVENT_HUB_SUCCESS_DELAY_SECS  Seconds a successful registration stays on screen
  EVENT_HUB_LOG_FILE            Log file used in TUI mode
  RUST_LOG                      Log filter
";

struct Args {
    overrides: ConfigOverrides,
    use_tui: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        overrides: ConfigOverrides {
            api_url: pargs
                .opt_value_from_str("--api")
                .context("Invalid --api value")?,
            storage_path: pargs
                .opt_value_from_str::<_, PathBuf>("--storage")
                .context("Invalid --storage value")?,
            ephemeral: pargs.contains("--ephemeral"),
        },
        use_tui: pargs.contains("--tui"),
    };

    let unused = pargs.finish();
    if !unused.is_empty() {
        anyhow::bail!("Unrecognized arguments: {:?}. See --help", unused);
    }

    run(args).await
}

async fn run(args: Args) -> Result<()> {
    let config = ClientConfig::from_env(args.overrides).context("Invalid configuration")?;
    config.validate().context("Invalid configuration")?;

    if args.use_tui {
        logging::init_to_file(&config.log_file)?;
    } else {
        logging::init()?;
    }
    tracing::info!(api_url = %config.api_url, tui = args.use_tui, "Starting event hub client");

    let store: Arc<dyn KeyValueStore> = match &config.storage_path {
        Some(path) => Arc::new(
            FileStore::open(path)
                .with_context(|| format!("Failed to open session store {}", path.display()))?,
        ),
        None => Arc::new(MemoryStore::new()),
    };
    let session = SessionStore::new(store);
    let api = TracedApi::shared(Arc::new(HttpEventsApi::new(config.api_url.clone())));

    if args.use_tui {
        let terminal = ratatui::init();
        let tui_app = TuiApp::new(api, session, &config.api_url, config.success_delay);
        let result = tui_app.run(terminal).await;
        ratatui::restore();
        result?;
    } else {
        let stdin = BufReader::new(tokio::io::stdin());
        let mut shell = Shell::new(
            api,
            session,
            &config.api_url,
            config.success_delay,
            stdin,
            std::io::stdout(),
        );
        shell.run().await?;
    }

    tracing::info!("Client exiting");
    Ok(())
}
