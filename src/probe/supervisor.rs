//! Primary probe: query the host's service supervisor.

use std::io::ErrorKind;
use std::time::Duration;

use tokio::process::Command;
use tokio::time;

use crate::probe::ProbeError;

/// Ask systemd whether the unit is active. A missing `systemctl` binary is
/// reported as [`ProbeError::MechanismUnavailable`] so the caller can take
/// the process-existence fallback.
pub(crate) async fn unit_is_active(unit: &str, timeout: Duration) -> Result<bool, ProbeError> {
    let mut command = Command::new("systemctl");
    command.arg("is-active").arg(unit);

    let output = time::timeout(timeout, command.output())
        .await
        .map_err(|_| ProbeError::Timeout(timeout))?
        .map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                ProbeError::MechanismUnavailable
            } else {
                ProbeError::Io(e)
            }
        })?;

    Ok(interpret_unit_state(&output.stdout))
}

/// `systemctl is-active` prints a single state word; only `active` counts
/// as UP. Exit status is deliberately ignored — inactive units answer with
/// a non-zero code and a perfectly clean `inactive`.
pub(crate) fn interpret_unit_state(stdout: &[u8]) -> bool {
    String::from_utf8_lossy(stdout).trim() == "active"
}
