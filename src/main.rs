use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use sevent_engagement::config::ConfigError;
use sevent_engagement::{
    Credential, EngagementConfig, EngagementError, EngagementKey, EngagementKind, EngagementRemote, HttpRemote,
    RemoteError, SubjectId, ToggleController,
};

/// Upper bound on waiting for a toggle cycle to settle, on top of the debounce.
const SETTLE_GRACE: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("remote error: {0}")]
    Remote(#[from] RemoteError),
    #[error("engagement error: {0}")]
    Engagement(#[from] EngagementError),
    #[error("login required: go to {path} (return to {from})")]
    LoginRequired { path: String, from: String },
    #[error("timed out waiting for confirmation")]
    Timeout,
    #[error("invalid JSON output: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "sevent-engage", about = "Like and save S Event events from the terminal")]
struct Cli {
    #[arg(long, env = "API_URL")]
    api_url: Option<String>,

    #[arg(long, env = "AUTH_TOKEN")]
    token: Option<String>,

    #[arg(long)]
    debounce_ms: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the viewer's engagement with an event.
    Status {
        event_id: String,
        #[arg(long, value_enum, default_value_t = KindArg::Like)]
        kind: KindArg,
    },
    /// Toggle an engagement, `times` clicks inside one debounce window.
    Toggle {
        event_id: String,
        #[arg(long, value_enum, default_value_t = KindArg::Like)]
        kind: KindArg,
        #[arg(long, default_value_t = 1)]
        times: u32,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum KindArg {
    Like,
    Save,
}

impl From<KindArg> for EngagementKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Like => Self::Like,
            KindArg::Save => Self::Save,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = EngagementConfig::from_env()?;
    if let Some(api_url) = cli.api_url.as_deref() {
        config = config.with_api_url(api_url);
    }
    if let Some(millis) = cli.debounce_ms {
        config = config.with_debounce_ms(millis)?;
    }

    let remote: Arc<dyn EngagementRemote> = Arc::new(HttpRemote::new(&config)?);
    let credential = cli.token.and_then(Credential::from_token);
    tracing::info!(api_url = %config.api_url, debounce = ?config.debounce, "engagement client ready");

    match cli.command {
        Command::Status { event_id, kind } => {
            let Some(credential) = credential else {
                return Err(login_required(&event_id));
            };
            let status = remote
                .check_status(&SubjectId::new(event_id), kind.into(), &credential)
                .await?;
            let out = serde_json::json!({ "active": status.active, "count": status.count });
            println!("{}", serde_json::to_string_pretty(&out)?);
            Ok(())
        }
        Command::Toggle { event_id, kind, times } => {
            let key = EngagementKey::new(event_id.as_str(), kind.into());
            let controller = ToggleController::load(key, credential.as_ref(), remote, config.debounce).await;
            toggle(&controller, credential.as_ref(), &event_id, times).await
        }
    }
}

async fn toggle(
    controller: &ToggleController,
    credential: Option<&Credential>,
    event_id: &str,
    times: u32,
) -> Result<(), CliError> {
    let mut states = controller.subscribe();
    let mut notices = controller.notices();

    for _ in 0..times {
        match controller.toggle(credential) {
            Ok(state) => tracing::debug!(active = state.active, count = state.count, "toggled"),
            Err(EngagementError::Unauthenticated) => return Err(login_required(event_id)),
            Err(e) => return Err(e.into()),
        }
    }

    let deadline = controller.debounce() + SETTLE_GRACE;
    tokio::time::timeout(deadline, states.wait_for(|state| !state.pending))
        .await
        .map_err(|_| CliError::Timeout)?
        .map_err(|_| CliError::Timeout)?;

    if let Ok(notice) = notices.try_recv() {
        eprintln!("toggle reverted: {}", notice.error);
    }

    println!("{}", serde_json::to_string_pretty(&controller.state())?);
    Ok(())
}

fn login_required(event_id: &str) -> CliError {
    let from = format!("/events/{event_id}");
    let redirect = EngagementError::Unauthenticated
        .login_redirect(&from)
        .map(|r| r.path.to_owned())
        .unwrap_or_default();
    CliError::LoginRequired { path: redirect, from }
}
