use async_trait::async_trait;
use axum::Router;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{error::AppResult, state::AppState};

pub mod handlers;
mod smtp;

pub use smtp::SmtpNotifier;

/// Outbound message handed to the gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Delivers a message to an address. Not tied to any store mutation.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, message: &Notification) -> AppResult<()>;
}

/// Used when no SMTP relay is configured: the message is only logged.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, message: &Notification) -> AppResult<()> {
        info!(to = %message.to, subject = %message.subject, "notification not delivered (smtp disabled)");
        Ok(())
    }
}

pub fn router() -> Router<AppState> {
    handlers::notify_routes()
}
