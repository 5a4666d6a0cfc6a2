//! Cross-crate constants. Tunable values live in `config::defaults`; these
//! are structural and not meant to be overridden.

/// Version stamped into every export document; imports reject other values.
pub const EXPORT_SCHEMA_VERSION: u32 = 1;

/// File name of the shared database under the per-user data directory.
pub const DB_FILE_NAME: &str = "contexts.db";

/// Directory under the platform data dir holding all Engram state.
pub const APP_DIR_NAME: &str = "engram";

/// Bytes-per-token divisor used for the token-equivalent of binary payloads.
pub const PAYLOAD_BYTES_PER_TOKEN: usize = 4;
