// tests/exit_status.rs

//! Mapping of raw exit statuses and signal numbers.

#![cfg(unix)]

use std::os::unix::process::ExitStatusExt;
use std::process::ExitStatus;

use proving_ground::exec::{ProcessExit, signal_name};

#[test]
fn common_signals_use_their_posix_names() {
    assert_eq!(signal_name(libc::SIGINT), "SIGINT");
    assert_eq!(signal_name(libc::SIGKILL), "SIGKILL");
    assert_eq!(signal_name(libc::SIGTERM), "SIGTERM");
}

#[test]
fn signals_above_fifteen_are_named() {
    assert_eq!(signal_name(libc::SIGXCPU), "SIGXCPU");
    assert_eq!(signal_name(libc::SIGXFSZ), "SIGXFSZ");
    assert_eq!(signal_name(libc::SIGVTALRM), "SIGVTALRM");
    assert_eq!(signal_name(libc::SIGPROF), "SIGPROF");
    assert_eq!(signal_name(libc::SIGSYS), "SIGSYS");
}

#[cfg(target_os = "linux")]
#[test]
fn linux_numbering_is_used_on_linux() {
    assert_eq!(signal_name(10), "SIGUSR1");
    assert_eq!(signal_name(12), "SIGUSR2");
    assert_eq!(signal_name(24), "SIGXCPU");
    assert_eq!(signal_name(25), "SIGXFSZ");
    assert_eq!(signal_name(26), "SIGVTALRM");
    assert_eq!(signal_name(27), "SIGPROF");
    assert_eq!(signal_name(31), "SIGSYS");
}

#[test]
fn unknown_signal_numbers_fall_back_to_number() {
    assert_eq!(signal_name(200), "SIG200");
}

#[test]
fn exit_status_killed_by_signal_carries_the_name() {
    let exit = ProcessExit::from(ExitStatus::from_raw(libc::SIGXCPU));
    assert_eq!(exit, ProcessExit::signalled("SIGXCPU"));
}

#[test]
fn exit_status_with_code_has_no_signal() {
    let exit = ProcessExit::from(ExitStatus::from_raw(3 << 8));
    assert_eq!(exit, ProcessExit::exited(3));
}
