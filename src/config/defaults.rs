//! Default configuration values

/// Name of the per-project configuration file
pub const CONFIG_FILE_NAME: &str = "debugsplit.toml";

/// Default debug store directory, relative to the working directory
pub const DEFAULT_DEBUG_DIR: &str = "debug";

/// Suffix appended to every file in the debug store
pub const DEBUG_FILE_SUFFIX: &str = ".debug";

/// Number of leading build-id characters used as the shard directory
pub const BUILD_ID_SHARD_LEN: usize = 2;

/// Object-copy tool name, before any architecture prefix
pub const OBJCOPY_TOOL: &str = "objcopy";

/// Strip tool name, before any architecture prefix
pub const STRIP_TOOL: &str = "strip";

/// Minimum proptest iterations
pub const MIN_PROPTEST_ITERATIONS: u32 = 100;

/// Default number of parallel split jobs
pub fn default_jobs() -> usize {
    num_cpus::get().max(1)
}
