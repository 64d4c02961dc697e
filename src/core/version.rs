/// The key under which every versioned state records its schema version.
pub const STATE_VERSION_KEY: &str = "stateVersion";

/// The version of the canonical state schema produced by the standard plan.
pub const LATEST_STATE_VERSION: u32 = 6;

/// The version assigned to values that carry no usable version tag.
pub const UNVERSIONED_STATE_VERSION: u32 = 0;
