//! spawn-layer - launch an executable without waiting for it
//!
//! One operation, [`spawn`], backed by the strategy of the host platform:
//! fork/exec on Unix, `CreateProcessW` on Windows. The strategy is picked at
//! compile time by the crate features:
//!
//! | features                               | result                          |
//! |----------------------------------------|---------------------------------|
//! | `guess-target` (default)               | host strategy                   |
//! | `target-unix` on a Unix host           | fork/exec                       |
//! | `target-windows` on a Windows host     | `CreateProcessW`                |
//! | no feature                             | build error                     |
//! | target feature for the other platform  | build error                     |
//! | `target-unix` + `target-windows`       | build error                     |
//!
//! CI builds each row (`.github/workflows/ci.yml`).
//!
//! ```rust,no_run
//! let launched = spawn_layer::spawn("echo", &["echo", "hello"])?;
//! println!("launched pid {}", launched.pid());
//! # Ok::<(), spawn_layer::LaunchError>(())
//! ```

#[cfg(all(feature = "target-unix", feature = "target-windows"))]
compile_error!("features `target-unix` and `target-windows` are mutually exclusive");

#[cfg(all(feature = "target-unix", not(unix)))]
compile_error!("feature `target-unix` selected on a non-Unix host; cross-compilation is not supported");

#[cfg(all(feature = "target-windows", not(windows)))]
compile_error!("feature `target-windows` selected on a non-Windows host; cross-compilation is not supported");

#[cfg(not(any(
    feature = "guess-target",
    feature = "target-unix",
    feature = "target-windows"
)))]
compile_error!("target detection is disabled: enable `target-unix` or `target-windows`");

#[cfg(not(any(unix, windows)))]
compile_error!("Unsupported platform: only Unix and Windows are currently supported");

mod factory;

pub use factory::{PlatformLauncher, PlatformLauncherFactory};
pub use spawn_layer_core::*;

/// Launch `program` with the full argument vector `args` using the default
/// configuration
///
/// Success means the OS accepted the launch; the child's exit status is never
/// observed. `args` conventionally starts with the program name.
pub fn spawn<S: AsRef<str>>(program: &str, args: &[S]) -> Result<Launched, LaunchError> {
    PlatformLauncher::default().spawn_command(program, args)
}

/// Same as [`spawn`] with an explicit configuration
pub fn spawn_with_config<S: AsRef<str>>(
    config: LauncherConfig,
    program: &str,
    args: &[S],
) -> Result<Launched, LaunchError> {
    PlatformLauncher::new(config).spawn_command(program, args)
}
