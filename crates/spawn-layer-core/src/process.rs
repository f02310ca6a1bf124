use crate::config::LauncherConfig;
use crate::error::LaunchError;
use derive_builder::Builder;
use std::fmt;

/// Operating-system identifier of a launched process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProcessId(pub u32);

impl From<u32> for ProcessId {
    fn from(pid: u32) -> Self {
        Self(pid)
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single request to launch an executable
///
/// `args` is the full argument vector seen by the child. By exec-family
/// convention the first element is the program name, but nothing enforces it.
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
#[builder(setter(into))]
pub struct LaunchRequest {
    pub program: String,
    #[builder(default)]
    #[builder(setter(custom))]
    pub args: Vec<String>,
}

impl LaunchRequest {
    pub fn new<P, S, I>(program: P, args: I) -> Self
    where
        P: Into<String>,
        S: Into<String>,
        I: IntoIterator<Item = S>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn builder() -> LaunchRequestBuilder {
        LaunchRequestBuilder::default()
    }

    /// Check the request against the launcher contract before any OS call
    pub fn validate(&self, config: &LauncherConfig) -> Result<(), LaunchError> {
        if self.program.is_empty() {
            return Err(LaunchError::InvalidRequest(
                "executable path is empty".to_string(),
            ));
        }

        if self.program.contains('\0') {
            return Err(LaunchError::InvalidRequest(format!(
                "executable path {:?} contains a NUL byte",
                self.program
            )));
        }

        if let Some(index) = self.args.iter().position(|arg| arg.contains('\0')) {
            return Err(LaunchError::InvalidRequest(format!(
                "argument {index} contains a NUL byte"
            )));
        }

        if let Some(max) = config.max_args {
            if self.args.len() > max {
                return Err(LaunchError::ArgumentCountExceeded {
                    count: self.args.len(),
                    max,
                });
            }
        }

        Ok(())
    }
}

impl LaunchRequestBuilder {
    pub fn args<S: ToString, I: IntoIterator<Item = S>>(&mut self, iter: I) -> &mut Self {
        let args: Vec<String> = iter.into_iter().map(|s| s.to_string()).collect();
        self.args = Some(args);
        self
    }

    pub fn arg<S: ToString>(&mut self, arg: S) -> &mut Self {
        self.args.get_or_insert_with(Vec::new).push(arg.to_string());
        self
    }
}

/// Outcome of a successful launch attempt
///
/// Says nothing about how the child eventually exits. The launcher keeps no
/// handle to the child; the pid is only reported so callers can reap or
/// observe it themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Launched {
    pid: ProcessId,
}

impl Launched {
    pub fn new(pid: impl Into<ProcessId>) -> Self {
        Self { pid: pid.into() }
    }

    pub fn pid(&self) -> ProcessId {
        self.pid
    }
}

/// Core trait for launching an executable without waiting for it
pub trait ProcessLauncher: Send + Sync {
    /// Configuration this launcher was created with
    fn config(&self) -> &LauncherConfig;

    /// Make a single synchronous launch attempt
    ///
    /// Returns once the OS has accepted or rejected the request. Never waits
    /// for the child to exit and never retries.
    fn spawn(&self, request: &LaunchRequest) -> Result<Launched, LaunchError>;

    /// Launch `program` with the full argument vector `args`
    fn spawn_command<S: AsRef<str>>(
        &self,
        program: &str,
        args: &[S],
    ) -> Result<Launched, LaunchError>
    where
        Self: Sized,
    {
        self.spawn(&LaunchRequest::new(program, args.iter().map(AsRef::<str>::as_ref)))
    }
}

/// Factory trait for creating platform-specific launchers
pub trait LauncherFactory {
    /// The type of launcher this factory creates
    type Launcher: ProcessLauncher;

    /// Create a launcher for the current platform
    fn create_launcher(config: LauncherConfig) -> Self::Launcher;

    /// Get the platform name for logging and debugging
    fn platform_name() -> &'static str;
}

impl ProcessLauncher for Box<dyn ProcessLauncher> {
    fn config(&self) -> &LauncherConfig {
        (**self).config()
    }

    fn spawn(&self, request: &LaunchRequest) -> Result<Launched, LaunchError> {
        (**self).spawn(request)
    }
}
