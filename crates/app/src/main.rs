mod cli;
mod prompt;
mod quiz_loop;
mod render;
mod survey;

use std::env;
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use quiz_core::model::{RankFilter, SignupForm, Subject};
use services::{ClientConfig, ClientServices, Clock, ConfigError, SessionStore};
use storage::FileCredentialRepository;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use ui::views::ViewError;
use ui::vm::{LeaderboardVm, SignupWizard, load_home, load_profile};
use ui::{AppContext, UiApp, build_app_context};

use crate::cli::{Cli, Commands};
use crate::prompt::Prompter;

const CREDENTIALS_DIR: &str = ".finquiz";
const CREDENTIALS_FILE: &str = "credentials.json";

fn init_tracing(cli: &Cli) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| cli.log_level.clone().into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Environment first, then command-line overrides.
fn resolve_config(cli: &Cli) -> Result<ClientConfig, ConfigError> {
    let mut config = ClientConfig::from_env()?;
    if let Some(raw) = &cli.api_base_url {
        config = config.with_base_url(raw)?;
    }
    if let Some(raw) = &cli.timeout_secs {
        config = config.with_timeout_secs(raw)?;
    }
    if let Some(raw) = &cli.rank_filter {
        let filter: RankFilter = raw
            .parse()
            .map_err(|_| ConfigError::InvalidRankFilter { raw: raw.clone() })?;
        config = config.with_rank_filter(filter);
    }
    if let Some(path) = &cli.credentials {
        config = config.with_credentials_path(Some(path.clone()));
    }
    if config.credentials_path.is_none() {
        config = config.with_credentials_path(Some(default_credentials_path()));
    }
    Ok(config)
}

fn default_credentials_path() -> PathBuf {
    let base = env::var_os("HOME").map_or_else(|| PathBuf::from("."), PathBuf::from);
    base.join(CREDENTIALS_DIR).join(CREDENTIALS_FILE)
}

async fn password_or_prompt(given: Option<String>) -> Result<String, Box<dyn Error>> {
    if let Some(password) = given {
        return Ok(password);
    }
    Prompter::stdin()
        .ask("Password: ")
        .await?
        .ok_or_else(|| "no password given".into())
}

async fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing(&cli);

    let config = resolve_config(&cli)?;
    tracing::debug!(base_url = %config.base_url, filter = config.rank_filter.as_str(), "configured");

    let credentials_path = config
        .credentials_path
        .clone()
        .unwrap_or_else(default_credentials_path);
    let repo = Arc::new(FileCredentialRepository::new(credentials_path));
    let session = SessionStore::restore(Clock::default_clock(), repo).await;

    let services: Arc<dyn UiApp> = Arc::new(ClientServices::from_config(&config)?);
    let mut ctx = build_app_context(&services, session);

    match cli.command {
        Commands::Login { id, password } => {
            let password = password_or_prompt(password).await?;
            let message = ctx.login(&id, &password).await?;
            println!("{}", message.unwrap_or_else(|| "Logged in.".to_string()));
        }
        Commands::Logout => {
            ctx.logout().await;
            println!("Logged out.");
        }
        Commands::Status => match ctx.session().current_credential() {
            Some(credential) if ctx.is_authenticated() => {
                println!("Logged in until {}", ui::vm::format_datetime(credential.expires_at()));
            }
            _ => println!("Not logged in."),
        },
        Commands::Home => {
            let home = load_home(&ctx, &CancellationToken::new()).await?;
            render::print_home(&home);
        }
        Commands::Profile => {
            let profile = load_profile(&ctx, &CancellationToken::new()).await?;
            render::print_profile(&profile);
        }
        Commands::Leaderboard { page, size } => {
            let mut board = LeaderboardVm::new(size);
            board.load(&ctx, page, &CancellationToken::new()).await?;
            println!("Page {}", board.page_number() + 1);
            render::print_leaderboard(&board.rows());
            if board.has_next() {
                println!("More: --page {}", board.page_number() + 1);
            }
        }
        Commands::Quiz { subject } => {
            let subject = Subject::new(&subject)?;
            quiz_loop::run(&ctx, subject).await?;
        }
        Commands::Signup {
            id,
            password,
            nickname,
            name,
            gender,
            age,
        } => {
            let password = password_or_prompt(password).await?;
            let form = SignupForm::new(id, password, nickname, name, gender, age)
                .map_err(ViewError::from)?;
            sign_up(&mut ctx, &form).await?;
        }
    }

    Ok(())
}

async fn sign_up(ctx: &mut AppContext, form: &SignupForm) -> Result<(), Box<dyn Error>> {
    let mut wizard = SignupWizard::new();
    wizard.submit_basic_info(ctx, form).await?;
    println!("Account created. A few questions to set up your profile.");

    let mut prompter = Prompter::stdin();
    if !survey::fill_draft(&mut prompter, wizard.draft_mut()).await? {
        println!("Survey skipped. You are logged in.");
        return Ok(());
    }
    wizard.submit_survey(ctx).await?;
    println!("All set.");
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
