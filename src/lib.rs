/// Public library interface for the Mood Journal MCP server
///
/// This module exports the streak tracker, the mood journal, their stores,
/// and the MCP server that exposes them as tools.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

// Internal modules
mod domain;
mod storage;
mod analytics;
mod journal;
mod tools;
mod mcp;

// Re-export public modules and types
pub use domain::*;
pub use storage::{InMemoryStorage, MoodEntryStore, ProfileStore, SqliteStorage, StorageError};
pub use analytics::{DistributionBucket, MoodStatsAggregator, MoodStatsSnapshot, CURRENT_STREAK_WINDOW_DAYS};
pub use journal::{JournalError, MoodJournal, SessionProvider, StaticSession, StreakTracker, MAX_RECENT_DAYS};
pub use mcp::protocol::{JsonRpcResponse, MCP_VERSION};
pub use mcp::McpServer;

/// Errors that can occur during server operation
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Database error: {0}")]
    Database(#[from] storage::StorageError),

    #[error("Domain validation error: {0}")]
    Domain(#[from] domain::DomainError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The streak tracker and mood journal wired to shared stores
///
/// Owns everything the MCP layer needs to answer a tool call on behalf of
/// the session user.
pub struct MoodJournalServer {
    profiles: Arc<dyn ProfileStore>,
    session: Arc<dyn SessionProvider>,
    clock: Arc<dyn Clock>,
    streaks: StreakTracker,
    journal: MoodJournal,
}

impl MoodJournalServer {
    /// Create a server backed by the SQLite database at `db_path`
    ///
    /// This will initialize the database schema if it doesn't already exist.
    pub async fn new(db_path: PathBuf, user_id: UserId) -> Result<Self, ServerError> {
        tracing::info!("Initializing Mood Journal server with database: {:?}", db_path);

        if user_id.as_str().trim().is_empty() {
            return Err(DomainError::InvalidValue {
                message: "user id cannot be empty".to_string(),
            }
            .into());
        }

        let storage = Arc::new(SqliteStorage::new(db_path)?);
        Ok(Self::with_stores(
            storage.clone(),
            storage,
            Arc::new(StaticSession::new(user_id)),
            Arc::new(SystemClock),
        ))
    }

    /// Assemble a server from explicit collaborators
    pub fn with_stores(
        profiles: Arc<dyn ProfileStore>,
        entries: Arc<dyn MoodEntryStore>,
        session: Arc<dyn SessionProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            streaks: StreakTracker::new(profiles.clone(), clock.clone()),
            journal: MoodJournal::new(entries, clock.clone()),
            profiles,
            session,
            clock,
        }
    }

    /// Run the MCP server, handling JSON-RPC requests over stdin/stdout
    ///
    /// This method will block until stdin is closed or an error occurs.
    pub async fn run(self) -> Result<(), ServerError> {
        match self.session.current_user_id() {
            Some(user) => tracing::info!("Serving journal for user {}", user),
            None => tracing::warn!("No session user; tool calls will be rejected"),
        }

        let mut mcp_server = McpServer::new(self);
        mcp_server.run().await
    }

    pub fn streaks(&self) -> &StreakTracker {
        &self.streaks
    }

    pub fn journal(&self) -> &MoodJournal {
        &self.journal
    }

    pub fn profiles(&self) -> &dyn ProfileStore {
        self.profiles.as_ref()
    }

    pub fn session(&self) -> &dyn SessionProvider {
        self.session.as_ref()
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }
}
