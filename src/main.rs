use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::Parser;

use unlock_kit::config::Config;
use unlock_kit::credential::Credential;
use unlock_kit::haptics::LoggedHaptics;
use unlock_kit::logging::init_tracing;
use unlock_kit::service::{AccessService, MockAccessService};
use unlock_kit::ui::credentials::CredentialListModel;
use unlock_kit::ui::unlock::{UnlockCardState, UnlockStateMachine};

/// Drive the credential list and unlock flow against the mock service.
#[derive(Debug, Parser)]
#[command(name = "unlock-kit", version)]
struct Cli {
    /// Config file (defaults to the platform config dir).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Filter credentials by name.
    #[arg(long, default_value = "")]
    search: String,

    /// Credential id to unlock. Defaults to the auto-selected credential.
    #[arg(long)]
    unlock: Option<String>,

    /// Override the unlock timeout, in seconds.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("loading config")?;

    let service: Arc<dyn AccessService> = Arc::new(MockAccessService::from_config(&config.mock));
    service
        .initialize(&config.mock.token)
        .context("initializing access service")?;

    let mut list = CredentialListModel::new(Arc::clone(&service))
        .with_auto_select_single(config.list.auto_select_single);
    list.on_appear().await;
    if let Some(err) = list.last_error() {
        bail!("activation failed: {err}");
    }

    list.set_search_text(cli.search.clone());
    for credential in list.filtered_credentials() {
        println!("{}", describe(credential));
    }

    let target = cli
        .unlock
        .clone()
        .or_else(|| list.selected_credential_id().map(str::to_string));
    if let Some(id) = target {
        let timeout = cli
            .timeout
            .map(Duration::from_secs)
            .unwrap_or_else(|| config.unlock.timeout());
        run_unlock(Arc::clone(&service), id, timeout).await;
    }

    service.deactivate(false);
    Ok(())
}

async fn run_unlock(service: Arc<dyn AccessService>, credential_id: String, timeout: Duration) {
    let machine = UnlockStateMachine::new(service, credential_id.clone(), timeout)
        .with_haptics(Arc::new(LoggedHaptics));
    let mut watcher = machine.watch();

    println!("{credential_id}: {:?}", machine.state());
    machine.start_unlock();
    let mut state = machine.state();
    println!("{credential_id}: {state:?}");

    while state.is_connecting() {
        match watcher.changed().await {
            Some(next) => {
                println!("{credential_id}: {next:?}");
                state = next;
            }
            None => break,
        }
    }

    if let UnlockCardState::Error(error) = &state {
        if let Some(action) = error.corrective_action() {
            println!("{credential_id}: suggested action {action:?}");
        }
    }
}

fn describe(credential: &Credential) -> String {
    let status = credential
        .blocking_error()
        .map(|e| e.title())
        .unwrap_or("ready");
    format!(
        "{:<16} {:<24} {:<12} {}",
        credential.id, credential.name, credential.integration, status
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_no_unlock_target() {
        let cli = Cli::parse_from(["unlock-kit"]);
        assert!(cli.unlock.is_none());
        assert!(cli.search.is_empty());
        assert!(cli.config.is_none());
    }

    #[test]
    fn parses_unlock_and_timeout() {
        let cli = Cli::parse_from(["unlock-kit", "--unlock", "front-door", "--timeout", "3"]);
        assert_eq!(cli.unlock.as_deref(), Some("front-door"));
        assert_eq!(cli.timeout, Some(3));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let result = Cli::try_parse_from(["unlock-kit", "--timeout", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn describe_shows_blocking_error() {
        let cred = Credential::new("g", "Garage", "seos")
            .with_errors(vec![unlock_kit::credential::CredentialError::Expired]);
        assert!(describe(&cred).ends_with("Key expired"));
    }
}
