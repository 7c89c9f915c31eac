//! `portal` entry point: loads settings, wires the HTTP adapters and runs
//! one command.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::io;
use std::sync::Arc;

use clap::Parser;
use color_eyre::Section;
use color_eyre::eyre::{WrapErr, eyre};
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use portal::config::{PortalSettings, SettingsError};
use portal::domain::ports::IdentityProvider;
use portal::domain::{Error, ErrorCode};
use portal::inbound::cli::{Cli, CliError, CliState, run};
use portal::outbound::dce::DceHttpBackend;
use portal::outbound::identity::IdentityToolkitProvider;

const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    // Arguments belong to clap; settings come from files and `DCE_*` only.
    let settings = PortalSettings::load_from_iter([OsString::from("portal")])
        .map_err(|error| eyre!("load settings: {error}"))?;
    init_tracing(settings.log_json);

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;
    runtime.block_on(async_main(cli, settings))
}

fn init_tracing(json: bool) {
    let builder = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr);
    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(e) = result {
        warn!(error = %e, "tracing init failed");
    }
}

fn identity_provider(
    settings: &PortalSettings,
) -> color_eyre::Result<Option<Arc<dyn IdentityProvider>>> {
    let api_key = match settings.identity_api_key() {
        Ok(key) => key,
        Err(SettingsError::MissingIdentityApiKey) => return Ok(None),
        Err(other) => return Err(other.into()),
    };
    let provider = IdentityToolkitProvider::new(
        settings.identity_base_url()?,
        api_key,
        settings.request_timeout(),
    )
    .wrap_err("build identity client")?;
    Ok(Some(Arc::new(provider)))
}

async fn async_main(cli: Cli, settings: PortalSettings) -> color_eyre::Result<()> {
    let backend = Arc::new(
        DceHttpBackend::new(settings.api_base_url()?, settings.request_timeout())
            .wrap_err("build backend client")?,
    );
    let state = CliState {
        registrations: backend.clone(),
        listings: backend.clone(),
        profiles: backend.clone(),
        research: backend.clone(),
        content: backend,
        identity: identity_provider(&settings)?,
        clock: Arc::new(DefaultClock),
        poll_interval: settings.status_poll_interval(),
    };

    let mut stdout = io::stdout().lock();
    run(cli.command, &state, &mut stdout)
        .await
        .map_err(|error| match error {
            CliError::Domain(domain) => eyre!("{}", shown_message(&domain))
                .note(format!("{}: {}", domain.code(), domain.message())),
            other => other.into(),
        })
}

/// Validation failures explain themselves; anything else shows the
/// backend's message or a generic line.
fn shown_message(error: &Error) -> &str {
    if error.code() == ErrorCode::InvalidRequest {
        error.message()
    } else {
        error.user_message(GENERIC_FAILURE)
    }
}
