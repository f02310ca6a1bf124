use spawn_layer_core::{LaunchError, LaunchRequest, Launched, LauncherConfig, ProcessLauncher};

/// Exit status of a child whose image replacement failed
pub const EXEC_FAILURE_STATUS: i32 = 127;

#[cfg(unix)]
mod unix_impl {
    use super::*;
    use nix::errno::Errno;
    use nix::libc;
    use nix::sys::wait::waitpid;
    use nix::unistd::{ForkResult, Pid, fork};
    use std::ffi::CString;
    use std::fs::File;
    use std::io::{self, Read};
    use std::os::fd::{AsRawFd, OwnedFd, RawFd};
    use std::ptr;
    use tracing::{debug, info, warn};

    /// Program and argument vector converted before forking, so the child
    /// never allocates
    struct ExecImage {
        program: CString,
        args: Vec<CString>,
    }

    impl ExecImage {
        fn new(request: &LaunchRequest) -> Result<Self, LaunchError> {
            let program = CString::new(request.program.as_str()).map_err(|_| {
                LaunchError::InvalidRequest("executable path contains a NUL byte".to_string())
            })?;
            let args = request
                .args
                .iter()
                .map(|arg| CString::new(arg.as_str()))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|_| {
                    LaunchError::InvalidRequest("argument contains a NUL byte".to_string())
                })?;

            Ok(Self { program, args })
        }

        /// NULL-terminated pointer array borrowing from `self.args`
        fn argv(&self) -> Vec<*const libc::c_char> {
            self.args
                .iter()
                .map(|arg| arg.as_ptr())
                .chain(std::iter::once(ptr::null()))
                .collect()
        }
    }

    /// Replace the image of the forked child, or report why it could not be
    /// replaced and exit. Only async-signal-safe calls are allowed here.
    unsafe fn exec_child(
        program: *const libc::c_char,
        argv: *const *const libc::c_char,
        status_fd: Option<RawFd>,
    ) -> ! {
        unsafe {
            libc::execvp(program, argv);

            if let Some(fd) = status_fd {
                let errno = Errno::last_raw().to_ne_bytes();
                libc::write(fd, errno.as_ptr().cast(), errno.len());
            }

            libc::_exit(EXEC_FAILURE_STATUS)
        }
    }

    /// Errno the child reported through the status pipe, if any
    ///
    /// The fork has already happened here, so a pipe that cannot be read is
    /// treated as a successful launch: the child may well be running.
    fn read_exec_status<R: Read>(mut reader: R, child: Pid) -> Option<i32> {
        let mut status = Vec::with_capacity(4);
        if let Err(e) = reader.read_to_end(&mut status) {
            warn!(pid = %child, error = %e, "Failed to read exec status, assuming launched");
            return None;
        }

        match <[u8; 4]>::try_from(status.as_slice()) {
            Ok(errno) => Some(i32::from_ne_bytes(errno)),
            Err(_) => {
                if !status.is_empty() {
                    warn!(pid = %child, len = status.len(), "Ignoring truncated exec status");
                }
                debug!(pid = %child, "Exec status pipe closed, image replaced");
                None
            }
        }
    }

    /// Close-on-exec pipe carrying the child's exec errno
    fn status_pipe() -> nix::Result<(OwnedFd, OwnedFd)> {
        #[cfg(not(target_vendor = "apple"))]
        {
            nix::unistd::pipe2(nix::fcntl::OFlag::O_CLOEXEC)
        }

        #[cfg(target_vendor = "apple")]
        {
            use nix::fcntl::{FcntlArg, FdFlag, fcntl};

            // No pipe2 here; a fork racing between these calls can inherit the fds
            let (read_end, write_end) = nix::unistd::pipe()?;
            fcntl(&read_end, FcntlArg::F_SETFD(FdFlag::FD_CLOEXEC))?;
            fcntl(&write_end, FcntlArg::F_SETFD(FdFlag::FD_CLOEXEC))?;
            Ok((read_end, write_end))
        }
    }

    /// Duplicate-and-replace launcher (fork + execvp)
    pub struct UnixLauncher {
        config: LauncherConfig,
    }

    impl Default for UnixLauncher {
        fn default() -> Self {
            Self::new(LauncherConfig::default())
        }
    }

    impl UnixLauncher {
        pub fn new(config: LauncherConfig) -> Self {
            debug!(
                report_exec_failure = config.report_exec_failure,
                "Initializing Unix launcher"
            );
            Self { config }
        }

        /// Block until the child has either replaced its image (pipe closes
        /// with nothing written) or reported an exec errno
        fn await_exec(
            &self,
            child: Pid,
            read_end: OwnedFd,
            request: &LaunchRequest,
        ) -> Result<(), LaunchError> {
            let Some(errno) = read_exec_status(File::from(read_end), child) else {
                return Ok(());
            };

            // The child exits right after writing; reap it so no zombie is left
            if let Err(e) = waitpid(child, None) {
                warn!(pid = %child, error = %e, "Failed to reap child after exec failure");
            }

            let source = io::Error::from_raw_os_error(errno);
            warn!(
                program = %request.program,
                error = %source,
                "Failed to replace process image"
            );
            Err(LaunchError::ImageReplacementFailed {
                program: request.program.clone(),
                source,
            })
        }
    }

    impl ProcessLauncher for UnixLauncher {
        fn config(&self) -> &LauncherConfig {
            &self.config
        }

        fn spawn(&self, request: &LaunchRequest) -> Result<Launched, LaunchError> {
            request.validate(&self.config)?;

            let image = ExecImage::new(request)?;
            let argv = image.argv();

            let pipe = if self.config.report_exec_failure {
                Some(status_pipe().map_err(io::Error::from)?)
            } else {
                None
            };
            let status_fd = pipe.as_ref().map(|(_, write_end)| write_end.as_raw_fd());

            // SAFETY: the child branch only runs exec_child, which sticks to
            // async-signal-safe calls on memory prepared before the fork.
            let child = match unsafe { fork() } {
                Ok(ForkResult::Parent { child }) => child,
                Ok(ForkResult::Child) => unsafe {
                    exec_child(image.program.as_ptr(), argv.as_ptr(), status_fd)
                },
                Err(errno) => {
                    warn!(
                        program = %request.program,
                        error = %errno,
                        "Failed to duplicate process"
                    );
                    return Err(LaunchError::DuplicationFailed {
                        source: errno.into(),
                    });
                }
            };

            if let Some((read_end, write_end)) = pipe {
                // Only the child may hold the write end, or the read never ends
                drop(write_end);
                self.await_exec(child, read_end, request)?;
            }

            info!(
                pid = %child,
                program = %request.program,
                args = ?request.args,
                "Launched Unix process"
            );

            Ok(Launched::new(child.as_raw() as u32))
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        /// Reader standing in for a pipe that fails mid-read
        struct BrokenPipe;

        impl Read for BrokenPipe {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::from_raw_os_error(libc::EIO))
            }
        }

        fn child() -> Pid {
            Pid::from_raw(1)
        }

        #[test]
        fn test_closed_pipe_means_launched() {
            assert_eq!(read_exec_status(io::empty(), child()), None);
        }

        #[test]
        fn test_errno_is_decoded() {
            let bytes = libc::ENOENT.to_ne_bytes();
            assert_eq!(
                read_exec_status(&bytes[..], child()),
                Some(libc::ENOENT)
            );
        }

        #[test]
        fn test_truncated_status_means_launched() {
            assert_eq!(read_exec_status(&[1u8, 2][..], child()), None);
        }

        #[test]
        fn test_unreadable_pipe_means_launched() {
            assert_eq!(read_exec_status(BrokenPipe, child()), None);
        }
    }
}

#[cfg(unix)]
pub use unix_impl::UnixLauncher;

#[cfg(not(unix))]
pub struct UnixLauncher {
    config: LauncherConfig,
}

#[cfg(not(unix))]
impl UnixLauncher {
    pub fn new(config: LauncherConfig) -> Self {
        Self { config }
    }
}

#[cfg(not(unix))]
impl Default for UnixLauncher {
    fn default() -> Self {
        Self::new(LauncherConfig::default())
    }
}

#[cfg(not(unix))]
impl ProcessLauncher for UnixLauncher {
    fn config(&self) -> &LauncherConfig {
        &self.config
    }

    fn spawn(&self, _request: &LaunchRequest) -> Result<Launched, LaunchError> {
        Err(LaunchError::Io(std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            "fork/exec launching requires a Unix host",
        )))
    }
}
