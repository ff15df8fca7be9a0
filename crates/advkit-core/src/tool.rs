//! Fixed facts about the external packaging tool's install layout and
//! script contract.

use std::path::{Path, PathBuf};

/// Windows GUI executable inside the tool home.
pub const TOOL_EXE: &str = "advinst.exe";

/// Command-line front end used for scripted builds and registration.
pub const TOOL_COM: &str = "AdvancedInstaller.com";

/// First line of every command script file.
pub const AIC_HEADER: &str = ";aic";

/// Oldest Windows release the tool installs on (Windows 7).
pub const MIN_WINDOWS_VERSION: &str = "6.1";

/// Binaries at or above this version register with `/RegisterCI`;
/// older ones only understand `/Register`.
pub const REGISTER_CI_SWITCH_VERSION: &str = "14.6";

/// Host-local path of the command-line binary under a tool home.
pub fn tool_com_path(home: &Path) -> PathBuf {
    home.join("bin").join("x86").join(TOOL_COM)
}
