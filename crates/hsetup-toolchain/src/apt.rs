//! OS packages installed through apt on linux runners.

use crate::strategy::Prerequisite;
use hsetup_core::Exec;
use hsetup_ui::RunnerChannel;
use tracing::debug;

/// ubuntu-24.04 only carries libncurses5 in the focal archive.
const FOCAL_SOURCES: &str = "echo 'deb https://security.ubuntu.com/ubuntu focal-security main universe' > /etc/apt/sources.list.d/ubuntu-focal-sources.list";

async fn sudo_sh(exec: &dyn Exec, script: &str) -> bool {
    let args = ["--", "sh", "-c", script].map(String::from);
    match exec.status("sudo", &args).await {
        Ok(code) => code == 0,
        Err(e) => {
            debug!("sudo could not run: {}", e);
            false
        }
    }
}

/// Install a prerequisite. Returns whether apt succeeded.
pub async fn install(exec: &dyn Exec, channel: &dyn RunnerChannel, prerequisite: Prerequisite) -> bool {
    match prerequisite {
        Prerequisite::BuildEssential => {
            channel.info("Installing build-essential using apt-get (for ghc-head)");
            sudo_sh(exec, "apt-get update && apt-get -y install build-essential").await
        }
        Prerequisite::LegacyCurses => {
            channel.info("Installing libcurses5 and libtinfo5 using apt-get (for ghc < 8.3)");
            sudo_sh(exec, FOCAL_SOURCES).await;
            sudo_sh(exec, "apt-get update && apt-get -y install libncurses5 libtinfo5").await
        }
    }
}
