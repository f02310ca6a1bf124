//! Unix launch strategy: duplicate the caller, replace the duplicate's image

mod unix_launcher;

pub use unix_launcher::{EXEC_FAILURE_STATUS, UnixLauncher};

use spawn_layer_core::{LauncherConfig, LauncherFactory};

pub struct UnixLauncherFactory;

impl LauncherFactory for UnixLauncherFactory {
    type Launcher = UnixLauncher;

    fn create_launcher(config: LauncherConfig) -> UnixLauncher {
        UnixLauncher::new(config)
    }

    fn platform_name() -> &'static str {
        "Unix"
    }
}
