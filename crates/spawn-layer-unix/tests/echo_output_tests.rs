//! Kept in its own test binary: the test swaps this process's stdout, which
//! the launched child inherits.
#![cfg(unix)]

use nix::libc;
use nix::sys::wait::{WaitStatus, waitpid};
use nix::unistd::Pid;
use spawn_layer_core::ProcessLauncher;
use spawn_layer_unix::UnixLauncher;
use std::os::fd::AsRawFd;

/// Point fd 1 at `file` for the duration of `f`
fn with_stdout_redirected<T>(file: &std::fs::File, f: impl FnOnce() -> T) -> T {
    // SAFETY: plain descriptor juggling on fds this test owns
    let saved = unsafe { libc::dup(libc::STDOUT_FILENO) };
    assert!(saved >= 0);
    assert!(unsafe { libc::dup2(file.as_raw_fd(), libc::STDOUT_FILENO) } >= 0);

    let result = f();

    unsafe {
        libc::dup2(saved, libc::STDOUT_FILENO);
        libc::close(saved);
    }
    result
}

#[test]
fn test_echo_hello_runs_with_its_arguments() {
    let out = tempfile::NamedTempFile::new().unwrap();

    let launched = with_stdout_redirected(out.as_file(), || {
        UnixLauncher::default()
            .spawn_command("echo", &["echo", "hello"])
            .unwrap()
    });

    let pid = Pid::from_raw(launched.pid().0 as i32);
    assert_eq!(waitpid(pid, None).unwrap(), WaitStatus::Exited(pid, 0));
    assert_eq!(std::fs::read_to_string(out.path()).unwrap(), "hello\n");
}
