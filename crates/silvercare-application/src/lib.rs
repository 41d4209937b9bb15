//! Application layer for SilverCare.
//!
//! Builds the stores from configuration and layers the companion flow and
//! quick-action scenarios on top of them.

pub mod companion;
pub mod context;
pub mod quick_actions;

pub use companion::CompanionService;
pub use context::{AppContext, AppContextBuilder, StoreRepositories, chat_service_for};
pub use quick_actions::{AlertSequence, QuickActions};
