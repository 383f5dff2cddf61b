//! Domain types.

mod environment;
mod format;
mod recipient;
mod version;

pub use environment::Environment;
pub use format::Format;
pub use recipient::{Access, Permission, Recipient, Role};
pub use version::{Receipt, SecretVersion, VersionSummary};
