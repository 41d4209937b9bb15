//! Infrastructure adapters: file-backed store persistence, config loading
//! and platform paths.

pub mod config_service;
pub mod conversation_repository;
pub mod dto;
pub mod health_repository;
pub mod notification_repository;
pub mod paths;
pub mod storage;

pub use config_service::ConfigService;
pub use conversation_repository::FileConversationRepository;
pub use health_repository::FileHealthRepository;
pub use notification_repository::FileNotificationRepository;
pub use paths::SilverCarePaths;
