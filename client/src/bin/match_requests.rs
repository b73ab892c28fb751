//! Inspect and act on mentorship match requests from the command line.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::io;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Context, Result, eyre};
use mentorship_client::domain::{
    ControllerSnapshot, IdentityContext, LifecyclePorts, MatchRequest, MatchRequestId,
    MatchRequestStatus, RequestCard, RequestLifecycleController, Role, UserId,
    mentee_outgoing_view, mentor_incoming_view,
};
use mentorship_client::outbound::http::{
    ApiClient, HttpCurrentUserSource, HttpMatchRequestRepository, HttpMentorDirectory,
};
use mentorship_client::{ClientSettings, SettingsOverrides};
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const BIN_NAME: &str = "match-requests";

/// `match-requests` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "match-requests",
    about = "List, send, and resolve mentorship match requests",
    version
)]
struct CliArgs {
    /// Base URL of the matching API. Falls back to `MENTORSHIP_API_BASE_URL`.
    #[arg(long = "api-base-url", value_name = "url", global = true)]
    api_base_url: Option<String>,
    /// Bearer token. Falls back to `MENTORSHIP_API_TOKEN`.
    #[arg(long = "api-token", value_name = "token", global = true)]
    api_token: Option<String>,
    /// Per-call timeout. Falls back to `MENTORSHIP_TIMEOUT_SECS`.
    #[arg(long = "timeout-secs", value_name = "seconds", global = true)]
    timeout_secs: Option<u64>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
enum Command {
    /// Show incoming requests (mentors) or outgoing requests (mentees).
    List,
    /// Send a request to a mentor.
    Create {
        #[arg(long = "mentor-id", value_name = "id")]
        mentor_id: u64,
        #[arg(long = "message", value_name = "text")]
        message: String,
    },
    /// Accept a pending incoming request.
    Accept { id: u64 },
    /// Reject a pending incoming request.
    Reject { id: u64 },
    /// Cancel a pending outgoing request.
    Cancel { id: u64 },
}

impl CliArgs {
    fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            api_base_url: self.api_base_url.clone(),
            api_token: self.api_token.clone(),
            timeout_secs: self.timeout_secs,
        }
    }
}

enum Outcome {
    Created(MatchRequest),
    Transitioned {
        id: MatchRequestId,
        status: MatchRequestStatus,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    let args = CliArgs::parse();
    let settings = ClientSettings::load_from_iter([OsString::from(BIN_NAME)])
        .map_err(|err| eyre!("failed to load client settings: {err}"))?
        .with_overrides(args.overrides());

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to build Tokio runtime")?;
    runtime.block_on(run(args.command, settings))
}

fn init_tracing() {
    if let Err(e) = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }
}

async fn run(command: Command, settings: ClientSettings) -> Result<()> {
    let config = settings
        .http_client_config()
        .wrap_err("invalid client settings")?;
    let api = ApiClient::new(config).wrap_err("failed to build HTTP client")?;

    let identity = IdentityContext::load(&HttpCurrentUserSource::new(api.clone()))
        .await
        .wrap_err("failed to load the signed-in user")?;
    info!(user_id = %identity.user_id(), role = %identity.role(), "session started");

    let controller = RequestLifecycleController::new(
        identity,
        LifecyclePorts::new(
            Arc::new(HttpMatchRequestRepository::new(api.clone())),
            Arc::new(HttpMentorDirectory::new(api)),
        ),
    );
    for line in command_lines(&controller, command).await? {
        println!("{line}");
    }
    Ok(())
}

/// Load the list, apply `command`, and render the outcome plus the view.
///
/// Only the initial load and the command itself can fail. A failed reload
/// after a successful update is shown as `refresh_error=`.
async fn command_lines(
    controller: &RequestLifecycleController,
    command: Command,
) -> Result<Vec<String>> {
    controller
        .refresh()
        .await
        .wrap_err("failed to load match requests")?;

    let mut lines = Vec::new();
    if let Some(outcome) = execute(controller, command).await? {
        lines.extend(outcome_lines(&outcome));
        if let Err(error) = controller.refresh().await {
            warn!(error = %error, "reload after update failed");
        }
    }

    lines.extend(view_lines(controller.identity(), &controller.state()));
    Ok(lines)
}

async fn execute(
    controller: &RequestLifecycleController,
    command: Command,
) -> Result<Option<Outcome>> {
    let outcome = match command {
        Command::List => return Ok(None),
        Command::Create { mentor_id, message } => controller
            .create_request(UserId::new(mentor_id), &message)
            .await
            .map(Outcome::Created)?,
        Command::Accept { id } => transition(id, controller.accept(id.into()).await?),
        Command::Reject { id } => transition(id, controller.reject(id.into()).await?),
        Command::Cancel { id } => transition(id, controller.cancel(id.into()).await?),
    };
    Ok(Some(outcome))
}

fn transition(id: u64, status: MatchRequestStatus) -> Outcome {
    Outcome::Transitioned {
        id: MatchRequestId::new(id),
        status,
    }
}

fn outcome_lines(outcome: &Outcome) -> Vec<String> {
    match outcome {
        Outcome::Created(request) => vec![
            format!("created_id={}", request.id()),
            format!("created_status={}", request.status().label()),
        ],
        Outcome::Transitioned { id, status } => vec![
            format!("updated_id={id}"),
            format!("updated_status={}", status.label()),
        ],
    }
}

fn view_lines(identity: &IdentityContext, snapshot: &ControllerSnapshot) -> Vec<String> {
    let cards = match identity.role() {
        Role::Mentor => mentor_incoming_view(identity, snapshot),
        Role::Mentee => mentee_outgoing_view(identity, snapshot),
    };
    let mut lines = vec![
        format!("role={}", identity.role()),
        format!("user_id={}", identity.user_id()),
        format!("request_count={}", cards.len()),
    ];
    if let Some(error) = &snapshot.last_error {
        lines.push(format!("refresh_error={error}"));
    }
    for card in &cards {
        lines.extend(card_lines(card));
    }
    lines
}

fn card_lines(card: &RequestCard) -> Vec<String> {
    let prefix = format!("request.{}", card.request_id);
    let actions = card
        .actions
        .iter()
        .filter(|offered| offered.enabled)
        .map(|offered| offered.action.as_str())
        .collect::<Vec<_>>()
        .join(",");
    let mut lines = vec![
        format!("{prefix}.status={}", card.status_label),
        format!("{prefix}.counterpart={}", card.counterpart.name),
        format!(
            "{prefix}.contact={}",
            card.counterpart.contact_label.as_deref().unwrap_or("")
        ),
        format!("{prefix}.message={}", card.message.escape_debug()),
        format!("{prefix}.actions={actions}"),
    ];
    if let Some(error) = &card.action_error {
        lines.push(format!("{prefix}.error={error}"));
    }
    lines
}
