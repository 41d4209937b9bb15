//! File-backed persistence for the conversation store.
//!
//! File location: `{data_dir}/silvercare-chat-store.json`

use std::path::Path;
use version_migrate::Migrator;

use silvercare_core::chat::PersistedConversation;
use silvercare_core::error::Result;
use silvercare_core::persistence::SnapshotRepository;

use crate::dto::create_conversation_migrator;
use crate::paths::CHAT_STORE_FILE;
use crate::storage::{AtomicFile, read_json};

pub struct FileConversationRepository {
    file: AtomicFile,
    migrator: Migrator,
}

impl FileConversationRepository {
    const ENTITY: &'static str = "conversation";

    pub fn new(data_dir: &Path) -> Result<Self> {
        Ok(Self {
            file: AtomicFile::new(data_dir.join(CHAT_STORE_FILE)),
            migrator: create_conversation_migrator()?,
        })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

impl SnapshotRepository<PersistedConversation> for FileConversationRepository {
    fn load(&self) -> Result<Option<PersistedConversation>> {
        let Some(value) = read_json(&self.file)? else {
            return Ok(None);
        };
        let conversation: PersistedConversation =
            self.migrator.load_flat_from(Self::ENTITY, value)?;
        Ok(Some(conversation))
    }

    fn save(&self, snapshot: &PersistedConversation) -> Result<()> {
        let serialized = self
            .migrator
            .save_domain_flat(Self::ENTITY, snapshot.clone())?;
        self.file.write(&serialized)?;
        Ok(())
    }
}
