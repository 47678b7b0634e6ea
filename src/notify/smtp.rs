use async_trait::async_trait;
use lettre::{
    message::Mailbox,
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::{debug, error};

use super::{Notification, Notifier};
use crate::{
    config::SmtpConfig,
    error::{AppError, AppResult},
};

pub struct SmtpNotifier {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpNotifier {
    /// Build the relay; no connection is made until the first send.
    pub fn new(cfg: &SmtpConfig) -> anyhow::Result<Self> {
        let creds = Credentials::new(cfg.username.clone(), cfg.password.clone());

        // 465 is implicit TLS, everything else upgrades with STARTTLS
        let tls_params = TlsParameters::new(cfg.host.clone())?;
        let tls = if cfg.port == 465 {
            Tls::Wrapper(tls_params)
        } else {
            Tls::Required(tls_params)
        };

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(&cfg.host)?
            .credentials(creds)
            .port(cfg.port)
            .tls(tls)
            .build();

        let from = cfg
            .from
            .parse::<Mailbox>()
            .map_err(|e| anyhow::anyhow!("SMTP_FROM={}: {e}", cfg.from))?;

        Ok(Self { mailer, from })
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, message: &Notification) -> AppResult<()> {
        let to = message
            .to
            .parse::<Mailbox>()
            .map_err(|e| AppError::Notification(format!("invalid recipient {}: {e}", message.to)))?;

        let email = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(message.subject.as_str())
            .body(message.body.clone())
            .map_err(|e| AppError::Notification(e.to_string()))?;

        match self.mailer.send(email).await {
            Ok(resp) => {
                debug!(to = %message.to, code = %resp.code(), "smtp accepted message");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, to = %message.to, "smtp send failed");
                Err(AppError::Notification(e.to_string()))
            }
        }
    }
}
