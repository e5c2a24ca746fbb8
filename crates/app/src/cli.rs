use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "finquiz")]
#[command(version, about = "Financial literacy quiz client")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Quiz service base url (overrides FINQUIZ_API_BASE_URL)
    #[arg(long, global = true)]
    pub api_base_url: Option<String>,

    /// Per-request timeout in seconds (overrides FINQUIZ_API_TIMEOUT_SECS)
    #[arg(long, global = true)]
    pub timeout_secs: Option<String>,

    /// Catalog rank filter: `exact` or `at-or-below` (overrides FINQUIZ_CATALOG_RANK_FILTER)
    #[arg(long, global = true)]
    pub rank_filter: Option<String>,

    /// Where the login token is kept between runs (overrides FINQUIZ_CREDENTIALS_PATH)
    #[arg(long, global = true)]
    pub credentials: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and keep the token for thirty minutes
    Login {
        #[arg(long)]
        id: String,

        /// Prompted for when omitted
        #[arg(long)]
        password: Option<String>,
    },

    /// Forget the stored token
    Logout,

    /// Show whether a live token is stored
    Status,

    /// Greeting, rank and recent quizzes
    Home,

    /// Literacy stats and radar values
    Profile,

    /// Users ranked by stat sum
    Leaderboard {
        /// Zero-based page number
        #[arg(long, default_value_t = 0)]
        page: u32,

        #[arg(long, default_value_t = services::DEFAULT_PAGE_SIZE)]
        size: u32,
    },

    /// Answer quizzes for a subject interactively
    Quiz {
        /// finance, invest or credit
        #[arg(default_value = "finance")]
        subject: String,
    },

    /// Create an account, log in and answer the onboarding survey
    Signup {
        #[arg(long)]
        id: String,

        /// Prompted for when omitted
        #[arg(long)]
        password: Option<String>,

        #[arg(long)]
        nickname: String,

        #[arg(long)]
        name: String,

        #[arg(long, default_value = "")]
        gender: String,

        #[arg(long)]
        age: u32,
    },
}
