//! Hard limits enforced by the engine.

/// Widest allowed free-slot query range.
pub const MAX_QUERY_WINDOW_DAYS: i64 = 366;

/// Longest allowed single appointment window.
pub const MAX_APPOINTMENT_DURATION_DAYS: i64 = 31;

/// Longest accepted `source` tag on an availability template.
pub const MAX_SOURCE_LEN: usize = 128;

/// Longest accepted `external_id` on an availability template.
pub const MAX_EXTERNAL_ID_LEN: usize = 128;

/// Most weekly templates one provider may carry.
pub const MAX_TEMPLATES_PER_PROVIDER: usize = 1024;

/// Most feed windows accepted in one sync run.
pub const MAX_SYNC_BATCH: usize = 4096;
