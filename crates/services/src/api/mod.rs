pub mod client;
pub(crate) mod dto;
pub mod scripted;
pub mod transport;

pub use client::ApiClient;
pub use reqwest::Method;
pub use scripted::{ScriptedReply, ScriptedTransport};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Transport};
