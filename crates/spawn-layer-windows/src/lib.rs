//! Windows launch strategy: build one command line, create the process in a single call

mod cmdline;
mod windows_launcher;

pub use cmdline::CommandLine;
pub use windows_launcher::WindowsLauncher;

use spawn_layer_core::{LauncherConfig, LauncherFactory};

/// Windows-specific launcher factory
pub struct WindowsLauncherFactory;

impl LauncherFactory for WindowsLauncherFactory {
    type Launcher = WindowsLauncher;

    fn create_launcher(config: LauncherConfig) -> WindowsLauncher {
        WindowsLauncher::new(config)
    }

    fn platform_name() -> &'static str {
        "Windows"
    }
}
