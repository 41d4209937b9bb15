//! Wires exactly one instance of each store from configuration.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use silvercare_core::chat::{ChatService, ConversationStore, PersistedConversation};
use silvercare_core::config::AppConfig;
use silvercare_core::notification::{NotificationStore, PersistedNotificationFeed};
use silvercare_core::persistence::{InMemoryRepository, SnapshotRepository};
use silvercare_core::profile::UserProfile;
use silvercare_core::telemetry::{PersistedTelemetry, RandomVitalsGenerator, TelemetryStore, VitalsGenerator};
use silvercare_core::time::{Clock, SystemClock};
use silvercare_infrastructure::{
    FileConversationRepository, FileHealthRepository, FileNotificationRepository, SilverCarePaths,
};
use silvercare_interaction::{ChatProxy, HttpChatClient};

use crate::companion::CompanionService;
use crate::quick_actions::QuickActions;

/// The persistence port of each store.
#[derive(Clone)]
pub struct StoreRepositories {
    pub conversation: Arc<dyn SnapshotRepository<PersistedConversation>>,
    pub health: Arc<dyn SnapshotRepository<PersistedTelemetry>>,
    pub notification: Arc<dyn SnapshotRepository<PersistedNotificationFeed>>,
}

impl StoreRepositories {
    /// One JSON file per store under `data_dir`.
    pub fn files(data_dir: &Path) -> Result<Self> {
        Ok(Self {
            conversation: Arc::new(
                FileConversationRepository::new(data_dir)
                    .context("Failed to open conversation storage")?,
            ),
            health: Arc::new(
                FileHealthRepository::new(data_dir).context("Failed to open health storage")?,
            ),
            notification: Arc::new(
                FileNotificationRepository::new(data_dir)
                    .context("Failed to open notification storage")?,
            ),
        })
    }

    /// Nothing survives the process.
    pub fn in_memory() -> Self {
        Self {
            conversation: Arc::new(InMemoryRepository::<PersistedConversation>::new()),
            health: Arc::new(InMemoryRepository::<PersistedTelemetry>::new()),
            notification: Arc::new(InMemoryRepository::<PersistedNotificationFeed>::new()),
        }
    }
}

/// Chat backend chosen by `[chat] direct`: the in-process proxy or the HTTP endpoint.
pub fn chat_service_for(config: &AppConfig) -> Result<Arc<dyn ChatService>> {
    if config.chat.direct {
        tracing::debug!("Using in-process chat proxy");
        return Ok(Arc::new(ChatProxy::from_config(&config.proxy)));
    }

    let client =
        HttpChatClient::from_config(&config.chat).context("Failed to create chat client")?;
    tracing::debug!("Using chat endpoint {}", client.url());
    Ok(Arc::new(client))
}

/// Everything a front end needs, built once per process.
pub struct AppContext {
    config: AppConfig,
    profile: UserProfile,
    data_dir: Option<PathBuf>,
    conversation: Arc<ConversationStore>,
    telemetry: Arc<TelemetryStore>,
    notifications: Arc<NotificationStore>,
    companion: CompanionService,
    quick_actions: QuickActions,
}

pub struct AppContextBuilder {
    config: AppConfig,
    repositories: Option<StoreRepositories>,
    data_dir: Option<PathBuf>,
    chat_service: Option<Arc<dyn ChatService>>,
    generator: Arc<dyn VitalsGenerator>,
    clock: Arc<dyn Clock>,
}

impl AppContextBuilder {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            repositories: None,
            data_dir: None,
            chat_service: None,
            generator: Arc::new(RandomVitalsGenerator),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn repositories(mut self, repositories: StoreRepositories) -> Self {
        self.repositories = Some(repositories);
        self
    }

    /// Stores files under `data_dir` instead of the configured location.
    pub fn data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(data_dir.into());
        self
    }

    pub fn chat_service(mut self, chat_service: Arc<dyn ChatService>) -> Self {
        self.chat_service = Some(chat_service);
        self
    }

    pub fn generator(mut self, generator: Arc<dyn VitalsGenerator>) -> Self {
        self.generator = generator;
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn build(self) -> Result<AppContext> {
        let config = self.config;

        let (repositories, data_dir) = match self.repositories {
            Some(repositories) => (repositories, self.data_dir),
            None => {
                let dir = match self.data_dir {
                    Some(dir) => dir,
                    None => SilverCarePaths::data_dir_or(config.data_dir.as_deref())
                        .context("Failed to resolve data directory")?,
                };
                (StoreRepositories::files(&dir)?, Some(dir))
            }
        };

        let chat_service = match self.chat_service {
            Some(service) => service,
            None => chat_service_for(&config)?,
        };

        let profile = config.profile();

        let conversation = Arc::new(ConversationStore::restore(
            chat_service,
            repositories.conversation,
            self.clock.clone(),
        ));
        let telemetry = Arc::new(
            TelemetryStore::restore(self.generator, repositories.health, self.clock.clone())
                .with_tick_interval(config.telemetry.tick_interval()),
        );
        let notifications = Arc::new(
            NotificationStore::restore(repositories.notification, self.clock)
                .with_info_auto_dismiss(config.notifications.info_auto_dismiss()),
        );

        let companion =
            CompanionService::new(conversation.clone(), notifications.clone(), profile.clone());
        let quick_actions = QuickActions::new(notifications.clone(), &profile);

        match &data_dir {
            Some(dir) => tracing::info!("SilverCare context ready (data: {})", dir.display()),
            None => tracing::info!("SilverCare context ready (custom storage)"),
        }

        Ok(AppContext {
            config,
            profile,
            data_dir,
            conversation,
            telemetry,
            notifications,
            companion,
            quick_actions,
        })
    }
}

impl AppContext {
    pub fn builder(config: AppConfig) -> AppContextBuilder {
        AppContextBuilder::new(config)
    }

    /// File-backed context using the configured chat backend.
    pub fn from_config(config: AppConfig) -> Result<Self> {
        AppContextBuilder::new(config).build()
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn data_dir(&self) -> Option<&Path> {
        self.data_dir.as_deref()
    }

    pub fn conversation(&self) -> &Arc<ConversationStore> {
        &self.conversation
    }

    pub fn telemetry(&self) -> &Arc<TelemetryStore> {
        &self.telemetry
    }

    pub fn notifications(&self) -> &Arc<NotificationStore> {
        &self.notifications
    }

    pub fn companion(&self) -> &CompanionService {
        &self.companion
    }

    pub fn quick_actions(&self) -> &QuickActions {
        &self.quick_actions
    }

    /// Starts the telemetry simulation when `[telemetry] autostart` is set.
    pub fn start(&self) -> Result<()> {
        if self.config.telemetry.autostart {
            self.telemetry
                .start()
                .context("Failed to start telemetry simulation")?;
        }
        Ok(())
    }

    pub fn shutdown(&self) {
        self.telemetry.stop();
        tracing::debug!("SilverCare context shut down");
    }
}

impl Drop for AppContext {
    fn drop(&mut self) {
        self.telemetry.stop();
    }
}
