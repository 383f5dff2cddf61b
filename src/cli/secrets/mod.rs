//! Secrets commands.
//!
//! Push, pull, sync, list, rotate and rollback for the bound project.

mod list;
mod pull;
mod push;
mod rollback;
mod rotate;
mod sync;

pub use list::execute as list;
pub use pull::execute as pull;
pub use push::execute as push;
pub use rollback::execute as rollback;
pub use rotate::execute as rotate;
pub use sync::execute as sync;

use std::path::PathBuf;

use crate::cli::context::ProjectContext;
use crate::cli::output;
use crate::core::domain::Environment;
use crate::core::workflow::Pushed;

/// Local plaintext file for `env`, relative to the project root.
fn default_path(project: &ProjectContext, env: Environment) -> PathBuf {
    project.root.join(env.default_file())
}

fn report_pushed(pushed: &Pushed) {
    output::success(&format!(
        "pushed {} version {}",
        pushed.receipt.environment, pushed.receipt.version
    ));
    output::kv("version id", &pushed.receipt.version_id);
    output::kv("size", format!("{} bytes", pushed.receipt.size_bytes));
    output::kv(
        "recipients",
        format!("{} ({})", pushed.recipients, pushed.fingerprint),
    );
    if !pushed.keyless.is_empty() {
        output::warn(&format!(
            "{} member(s) have no public key and can't decrypt:",
            pushed.keyless.len()
        ));
        for member in &pushed.keyless {
            output::list_item(member);
        }
    }
}
