use spawn_layer_core::{LaunchError, LaunchRequest, Launched, LauncherConfig, LauncherFactory, ProcessLauncher};
use tracing::info;

/// Platform launcher selected at compile time
pub enum PlatformLauncher {
    #[cfg(unix)]
    Unix(spawn_layer_unix::UnixLauncher),
    #[cfg(windows)]
    Windows(spawn_layer_windows::WindowsLauncher),
}

impl PlatformLauncher {
    pub fn new(config: LauncherConfig) -> Self {
        #[cfg(unix)]
        {
            info!("Creating Unix launcher");
            Self::Unix(spawn_layer_unix::UnixLauncherFactory::create_launcher(config))
        }

        #[cfg(windows)]
        {
            info!("Creating Windows launcher");
            Self::Windows(spawn_layer_windows::WindowsLauncherFactory::create_launcher(
                config,
            ))
        }
    }

    pub fn platform_name() -> &'static str {
        #[cfg(unix)]
        {
            spawn_layer_unix::UnixLauncherFactory::platform_name()
        }

        #[cfg(windows)]
        {
            spawn_layer_windows::WindowsLauncherFactory::platform_name()
        }
    }
}

impl Default for PlatformLauncher {
    fn default() -> Self {
        Self::new(LauncherConfig::default())
    }
}

impl ProcessLauncher for PlatformLauncher {
    fn config(&self) -> &LauncherConfig {
        match self {
            #[cfg(unix)]
            Self::Unix(launcher) => launcher.config(),
            #[cfg(windows)]
            Self::Windows(launcher) => launcher.config(),
        }
    }

    fn spawn(&self, request: &LaunchRequest) -> Result<Launched, LaunchError> {
        match self {
            #[cfg(unix)]
            Self::Unix(launcher) => launcher.spawn(request),
            #[cfg(windows)]
            Self::Windows(launcher) => launcher.spawn(request),
        }
    }
}

/// Platform-agnostic factory that selects the appropriate implementation at compile time
pub struct PlatformLauncherFactory;

impl LauncherFactory for PlatformLauncherFactory {
    type Launcher = PlatformLauncher;

    fn create_launcher(config: LauncherConfig) -> PlatformLauncher {
        PlatformLauncher::new(config)
    }

    fn platform_name() -> &'static str {
        PlatformLauncher::platform_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_detection() {
        let platform = PlatformLauncherFactory::platform_name();
        #[cfg(unix)]
        assert_eq!(platform, "Unix");
        #[cfg(windows)]
        assert_eq!(platform, "Windows");
    }

    #[test]
    fn test_factory_keeps_config() {
        let launcher = PlatformLauncherFactory::create_launcher(LauncherConfig::legacy());
        assert_eq!(launcher.config(), &LauncherConfig::legacy());
        assert_eq!(PlatformLauncher::default().config(), &LauncherConfig::default());
    }

    #[test]
    fn test_dispatch_checks_contract() {
        let launcher = PlatformLauncher::default();
        assert!(matches!(
            launcher.spawn_command("", &["x"]),
            Err(LaunchError::InvalidRequest(_))
        ));
    }
}
