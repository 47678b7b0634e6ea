use std::sync::Arc;

use tracing::warn;

use crate::{
    complaints::repo::{ComplaintStore, MemoryComplaintStore, PgComplaintStore},
    config::{AppConfig, DEFAULT_MAX_BODY_BYTES},
    db,
    notify::{LogNotifier, Notifier, SmtpNotifier},
    users::repo::{MemoryUserStore, PgUserStore, UserStore},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserStore>,
    pub complaints: Arc<dyn ComplaintStore>,
    pub notifier: Arc<dyn Notifier>,
}

impl AppState {
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let config = Arc::new(config);

        let (users, complaints) = match config.database_url.as_deref() {
            Some(url) => {
                let pool = db::connect(&config, url).await?;
                (
                    Arc::new(PgUserStore::new(pool.clone())) as Arc<dyn UserStore>,
                    Arc::new(PgComplaintStore::new(pool)) as Arc<dyn ComplaintStore>,
                )
            }
            None => {
                warn!("DATABASE_URL not set; using in-memory stores, data is lost on restart");
                (
                    Arc::new(MemoryUserStore::default()) as Arc<dyn UserStore>,
                    Arc::new(MemoryComplaintStore::default()) as Arc<dyn ComplaintStore>,
                )
            }
        };

        let notifier = match &config.smtp {
            Some(smtp) => Arc::new(SmtpNotifier::new(smtp)?) as Arc<dyn Notifier>,
            None => {
                warn!("SMTP not configured; notifications will only be logged");
                Arc::new(LogNotifier) as Arc<dyn Notifier>
            }
        };

        Ok(Self::from_parts(config, users, complaints, notifier))
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        users: Arc<dyn UserStore>,
        complaints: Arc<dyn ComplaintStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            config,
            users,
            complaints,
            notifier,
        }
    }

    /// Empty in-memory stores and a logging notifier.
    pub fn in_memory() -> Self {
        let config = Arc::new(AppConfig {
            host: "127.0.0.1".into(),
            port: 0,
            database_url: None,
            db_max_connections: 1,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            smtp: None,
        });

        Self::from_parts(
            config,
            Arc::new(MemoryUserStore::default()),
            Arc::new(MemoryComplaintStore::default()),
            Arc::new(LogNotifier),
        )
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        let mut config = (*self.config).clone();
        config.max_body_bytes = max_body_bytes;
        self.config = Arc::new(config);
        self
    }
}
