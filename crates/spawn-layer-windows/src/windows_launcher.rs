use crate::cmdline::CommandLine;
use spawn_layer_core::{LaunchError, LaunchRequest, Launched, LauncherConfig, ProcessLauncher};
use tracing::debug;

/// Single-call launcher (`CreateProcessW`)
pub struct WindowsLauncher {
    config: LauncherConfig,
}

impl Default for WindowsLauncher {
    fn default() -> Self {
        Self::new(LauncherConfig::default())
    }
}

impl WindowsLauncher {
    pub fn new(config: LauncherConfig) -> Self {
        debug!(
            quote_arguments = config.quote_arguments,
            creation_flags = config.creation_flags,
            "Initializing Windows launcher"
        );
        Self { config }
    }

    /// Command line handed to the child for `request`
    pub fn command_line(&self, request: &LaunchRequest) -> CommandLine {
        if self.config.quote_arguments {
            CommandLine::quoted(&request.args)
        } else {
            CommandLine::joined(&request.args)
        }
    }
}

#[cfg(windows)]
mod windows_impl {
    use super::*;
    use std::ffi::OsStr;
    use std::io;
    use std::os::windows::ffi::OsStrExt;
    use tracing::{info, warn};
    use windows::Win32::Foundation::{CloseHandle, HANDLE};
    use windows::Win32::System::Threading::{
        CreateProcessW, PROCESS_CREATION_FLAGS, PROCESS_INFORMATION, STARTUPINFOW,
    };
    use windows::core::{PCWSTR, PWSTR};

    /// Process and thread handles from `CreateProcessW`, closed on drop
    struct CreatedProcess(PROCESS_INFORMATION);

    impl Drop for CreatedProcess {
        fn drop(&mut self) {
            for handle in [self.0.hThread, self.0.hProcess] {
                close(handle);
            }
        }
    }

    fn close(handle: HANDLE) {
        if handle.is_invalid() {
            return;
        }
        // SAFETY: the handle came from CreateProcessW and is closed exactly once
        if let Err(e) = unsafe { CloseHandle(handle) } {
            warn!(error = %e, "Failed to close process handle");
        }
    }

    fn wide(s: &str) -> Vec<u16> {
        OsStr::new(s).encode_wide().chain(std::iter::once(0)).collect()
    }

    impl ProcessLauncher for WindowsLauncher {
        fn config(&self) -> &LauncherConfig {
            &self.config
        }

        fn spawn(&self, request: &LaunchRequest) -> Result<Launched, LaunchError> {
            request.validate(&self.config)?;

            let application = wide(&request.program);
            let command_line = self.command_line(request);
            debug!(command_line = %command_line, "Built command line");
            let mut command_line = command_line.to_wide();

            let startup = STARTUPINFOW {
                cb: std::mem::size_of::<STARTUPINFOW>() as u32,
                ..Default::default()
            };
            let mut info = PROCESS_INFORMATION::default();

            // SAFETY: every buffer outlives the call and the command line is
            // mutable and NUL-terminated as CreateProcessW requires.
            let created = unsafe {
                CreateProcessW(
                    PCWSTR(application.as_ptr()),
                    Some(PWSTR(command_line.as_mut_ptr())),
                    None,
                    None,
                    false,
                    PROCESS_CREATION_FLAGS(self.config.creation_flags),
                    None,
                    PCWSTR::null(),
                    &startup,
                    &mut info,
                )
            };

            if let Err(e) = created {
                let source = io::Error::from_raw_os_error(e.code().0 & 0xFFFF);
                warn!(
                    program = %request.program,
                    error = %source,
                    "Failed to create process"
                );
                return Err(LaunchError::ProcessCreationFailed {
                    program: request.program.clone(),
                    source,
                });
            }

            let process = CreatedProcess(info);
            let pid = process.0.dwProcessId;
            drop(process);

            info!(
                pid = %pid,
                program = %request.program,
                args = ?request.args,
                "Launched Windows process"
            );

            Ok(Launched::new(pid))
        }
    }
}

#[cfg(not(windows))]
impl ProcessLauncher for WindowsLauncher {
    fn config(&self) -> &LauncherConfig {
        &self.config
    }

    fn spawn(&self, request: &LaunchRequest) -> Result<Launched, LaunchError> {
        request.validate(&self.config)?;
        debug!(command_line = %self.command_line(request), "Built command line");
        Err(LaunchError::Io(std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            "CreateProcessW launching requires a Windows host",
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line_follows_config() {
        let request = LaunchRequest::new("C:\\tools\\echo.exe", ["echo", "hello world"]);

        let quoted = WindowsLauncher::default().command_line(&request);
        assert_eq!(quoted.as_str(), r#"echo "hello world""#);

        let legacy = WindowsLauncher::new(LauncherConfig::legacy()).command_line(&request);
        assert_eq!(legacy.as_str(), "echo hello world");
    }

    #[test]
    fn test_contract_checked_before_creation() {
        let launcher = WindowsLauncher::new(LauncherConfig::legacy());
        let args: Vec<String> = (0..101).map(|i| i.to_string()).collect();
        let err = launcher
            .spawn(&LaunchRequest::new("prog.exe", &args))
            .unwrap_err();
        assert!(matches!(err, LaunchError::ArgumentCountExceeded { .. }));

        let err = launcher.spawn_command("", &["x"]).unwrap_err();
        assert!(err.is_contract_violation());
    }
}
