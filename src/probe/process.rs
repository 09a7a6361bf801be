//! Fallback probe: look for a live process by exact name.

use std::time::Duration;

use tokio::process::Command;
use tokio::time;

use crate::probe::ProbeError;

/// True if any of the candidate process names has a live process. Checked
/// in order; the first hit short-circuits.
pub(crate) async fn any_alive(names: &[String], timeout: Duration) -> Result<bool, ProbeError> {
    for name in names {
        if process_exists(name, timeout).await? {
            return Ok(true);
        }
    }
    Ok(false)
}

async fn process_exists(name: &str, timeout: Duration) -> Result<bool, ProbeError> {
    let mut command = Command::new("pgrep");
    command.arg("-x").arg(name);

    let output = time::timeout(timeout, command.output())
        .await
        .map_err(|_| ProbeError::Timeout(timeout))??;

    // pgrep exits 0 when at least one process matched.
    Ok(output.status.success())
}
