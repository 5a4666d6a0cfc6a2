//! Default values for every tunable. Referenced by the config structs'
//! `Default` impls so TOML files only need to name what they change.

/// Records accessed within this many hours are hot (L0).
pub const DEFAULT_HOT_THRESHOLD_HOURS: u64 = 24;

/// Records accessed within this many hours (but past hot) are warm (L1).
pub const DEFAULT_WARM_THRESHOLD_HOURS: u64 = 24 * 7;

/// Maximum number of entries held by the hot cache.
pub const DEFAULT_L0_MAX_ENTRIES: usize = 100;

/// Maximum payload bytes held by the hot cache (5 MiB).
pub const DEFAULT_L0_MAX_BYTES: usize = 5 * 1024 * 1024;

/// Access count at which a warm record is promoted into L0 by a
/// tier-migration sweep.
pub const DEFAULT_PROMOTION_THRESHOLD: u64 = 10;

/// Compression falls back to passthrough when the artifact's
/// token-equivalent exceeds `original_tokens * slack`.
pub const DEFAULT_SLACK_FACTOR: f64 = 1.05;

/// Number of read connections in the pool.
pub const DEFAULT_READ_POOL_SIZE: usize = 4;

/// Estimated price per 1000 tokens, used for the cost-saved figure.
pub const DEFAULT_COST_PER_1K_TOKENS: f64 = 0.003;

/// Trailing window treated as "the current session" by analytics.
pub const DEFAULT_SESSION_WINDOW_HOURS: u64 = 12;

/// Metric rows older than this are removed by retention cleanup.
pub const DEFAULT_METRIC_RETENTION_DAYS: u64 = 90;
