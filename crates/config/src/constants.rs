//! Centralized defaults for the concierge
//!
//! Single source for the default values referenced by the settings
//! structs and by crates that need a value without a loaded `Settings`.

/// Reply pacing applied by the host before an agent entry is revealed
pub mod timing {
    /// Lower bound of the randomized typing delay for typed messages
    pub const TYPING_DELAY_MIN_MS: u64 = 1000;

    /// Upper bound of the randomized typing delay for typed messages
    pub const TYPING_DELAY_MAX_MS: u64 = 2000;

    /// Fixed delay for quick-reply chips
    pub const QUICK_REPLY_DELAY_MS: u64 = 800;

    /// Hard ceiling accepted by validation
    pub const MAX_DELAY_MS: u64 = 30_000;
}

/// Session lifecycle
pub mod sessions {
    pub const MAX_SESSIONS: usize = 1000;

    /// Inactivity before a session is swept (30 minutes)
    pub const SESSION_TIMEOUT_SECS: u64 = 1800;

    pub const CLEANUP_INTERVAL_SECS: u64 = 60;
}

/// Lead hand-off defaults
pub mod leads {
    /// Source tag stored with every lead
    pub const SOURCE: &str = "chatbot";

    pub const JSONL_PATH: &str = "data/leads.jsonl";

    pub const WEBHOOK_TIMEOUT_MS: u64 = 5000;

    /// Capacity of the channel between sessions and the store worker
    pub const CHANNEL_CAPACITY: usize = 256;

    pub const SCYLLA_HOST: &str = "127.0.0.1:9042";

    pub const SCYLLA_KEYSPACE: &str = "concierge";
}

/// HTTP server
pub mod server {
    pub const HOST: &str = "0.0.0.0";
    pub const PORT: u16 = 8080;
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;
}
