#![forbid(unsafe_code)]

pub mod answer_service;
pub mod api;
pub mod catalog_service;
pub mod client_services;
pub mod completion_service;
pub mod config;
pub mod error;
pub mod leaderboard_service;
pub mod profile_service;
pub mod session_store;
pub mod signup_service;

pub use quiz_core::Clock;

pub use answer_service::{AnswerService, SubmissionOutcome};
pub use api::{
    ApiClient, ApiRequest, ApiResponse, HttpTransport, Method, ScriptedReply, ScriptedTransport,
    Transport,
};
pub use catalog_service::QuizCatalog;
pub use client_services::ClientServices;
pub use completion_service::{CompletionTracker, RECENT_RESULTS_LIMIT};
pub use config::ClientConfig;
pub use error::{ApiError, AuthError, ClientServicesError, ConfigError, SignupError, TransportError};
pub use leaderboard_service::{DEFAULT_PAGE_SIZE, LeaderboardService};
pub use profile_service::ProfileService;
pub use session_store::{LoginAck, SessionStore};
pub use signup_service::SignupService;
