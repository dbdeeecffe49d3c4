//! quickstart-web: serves the QuickStart form on a local port and runs the automation
//! script on the operator's behalf.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{info, warn};

use quickstart_web::auth::UreqProbe;
use quickstart_web::config::{self, Config};
use quickstart_web::error::ResultExt;
use quickstart_web::executor::{Interpreter, ProcessBridge, ProcessRunner};
use quickstart_web::form::{default_sdm_name, FormState};
use quickstart_web::logging;
use quickstart_web::session::{run_dispatcher, Session, SessionSettings};
use quickstart_web::web::{self, AppState};

/// Give the server a moment to start accepting before the browser asks for the page
const BROWSER_OPEN_DELAY: Duration = Duration::from_millis(600);

#[derive(Parser)]
#[command(name = "quickstart-web")]
#[command(about = "Local web front-end for the SDM QuickStart automation script")]
struct Cli {
    /// Config file (default: ~/.quickstart/config.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Automation script to run
    #[arg(long)]
    script: Option<PathBuf>,

    /// Port to listen on; 0 picks a free port
    #[arg(long)]
    port: Option<u16>,

    /// Don't open the page in the default browser
    #[arg(long)]
    no_browser: bool,
}

impl Cli {
    /// File, then environment, then flags
    fn resolve_config(&self) -> Config {
        let mut config = match &self.config {
            Some(path) => {
                let mut config = config::load_config_from(path);
                config::apply_env_overrides(&mut config, |key| std::env::var(key).ok());
                config
            }
            None => config::load_config(),
        };
        if let Some(script) = &self.script {
            config.script_path = Some(script.clone());
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if self.no_browser {
            config.server.open_browser = false;
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = logging::init();
    let config = cli.resolve_config();
    info!(log_file = %logging::log_path().display(), "Logging initialized");

    let settings = SessionSettings::from_config(&config);
    if !settings.script_path.is_file() {
        warn!(
            path = %settings.script_path.display(),
            "Automation script not found, actions will fail until it is in place"
        );
    }
    info!(
        interpreter = %config.interpreter.program,
        script = %settings.script_path.display(),
        style = ?settings.invocation_style,
        "Configuration loaded"
    );

    let bridge = ProcessBridge::new(
        Interpreter::new(config.interpreter.clone()),
        Arc::new(ProcessRunner),
    );
    let probe = Arc::new(UreqProbe::from_config(&config.probe));
    let (events_tx, events_rx) = async_channel::unbounded();
    let sdm_name = default_sdm_name(|key| std::env::var(key).ok());
    let session = Arc::new(Session::new(
        FormState::new(sdm_name),
        settings,
        bridge,
        probe,
        events_tx,
    ));

    tokio::spawn(run_dispatcher(Arc::clone(&session), events_rx));
    session.start_probe();

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    let local_addr = listener
        .local_addr()
        .context("Failed to read the bound address")?;
    let url = format!("http://{}", local_addr);
    logging::log("APP", &format!("QuickStart is serving on {}", url));

    if config.server.open_browser {
        let url = url.clone();
        tokio::spawn(async move {
            tokio::time::sleep(BROWSER_OPEN_DELAY).await;
            open::that(&url).warn_on_err();
        });
    }

    web::serve(listener, AppState::new(session))
        .await
        .context("Server error")?;
    Ok(())
}
