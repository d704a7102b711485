// Host-level actions the operator can trigger from the command line

use tracing::{info, warn};

use crate::external::command::{CommandError, CommandExecutor, CommandOutput};

pub const REBOOT_BANNER: &str = "REBOOTING SYSTEM\n\nSTANDBY...";

/// Ask the host to reboot. Returns once the command has been accepted.
pub async fn reboot_system(executor: &dyn CommandExecutor) -> Result<CommandOutput, CommandError> {
    info!("Rebooting system");
    let output = executor.execute("sudo", &["reboot"]).await?;
    if !output.success() {
        warn!(status = output.status_code, "Reboot refused");
        return Err(CommandError::Failed {
            command: "sudo reboot".to_string(),
            status_code: output.status_code,
            stderr: output.stderr.trim().to_string(),
        });
    }
    Ok(output)
}
