//! Kept in its own test binary: counting open descriptors only works while
//! no other test is spawning.
#![cfg(target_os = "linux")]

use nix::sys::wait::{WaitStatus, waitpid};
use nix::unistd::Pid;
use spawn_layer_core::{LauncherConfig, ProcessLauncher};
use spawn_layer_unix::{EXEC_FAILURE_STATUS, UnixLauncher};

fn open_fds() -> usize {
    std::fs::read_dir("/proc/self/fd")
        .expect("procfs should be mounted")
        .count()
}

fn reap(pid: u32) -> WaitStatus {
    let pid = Pid::from_raw(pid as i32);
    waitpid(pid, None).unwrap()
}

#[test]
fn test_spawn_leaves_no_descriptors_open() {
    let launcher = UnixLauncher::default();
    let fire_and_forget = UnixLauncher::new(LauncherConfig::fire_and_forget());
    let before = open_fds();

    for _ in 0..20 {
        let launched = launcher.spawn_command("true", &["true"]).unwrap();
        assert_eq!(
            reap(launched.pid().0),
            WaitStatus::Exited(Pid::from_raw(launched.pid().0 as i32), 0)
        );

        assert!(launcher
            .spawn_command("/no/such/binary", &["/no/such/binary"])
            .is_err());
    }

    let launched = fire_and_forget
        .spawn_command("/no/such/binary", &["/no/such/binary"])
        .unwrap();
    assert_eq!(
        reap(launched.pid().0),
        WaitStatus::Exited(
            Pid::from_raw(launched.pid().0 as i32),
            EXEC_FAILURE_STATUS
        )
    );

    assert_eq!(open_fds(), before);
}
