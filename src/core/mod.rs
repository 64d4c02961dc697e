pub mod error;
pub mod version;

pub use error::{Result, StateError};
pub use version::{LATEST_STATE_VERSION, STATE_VERSION_KEY, UNVERSIONED_STATE_VERSION};
