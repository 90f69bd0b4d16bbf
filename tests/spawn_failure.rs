//! Repeated spawn failures must not leak pty handles
//!
//! Kept in its own test binary so no other test opens descriptors while
//! the count is taken.

#![cfg(target_os = "linux")]

use std::fs;

use nix::pty::openpty;
use ptywrap::{Config, Error, PtyRunner, TerminalSnapshot, WindowSize};

fn open_fds() -> usize {
    fs::read_dir("/proc/self/fd").unwrap().count()
}

#[test]
fn test_repeated_spawn_failures_leak_nothing() {
    let tty = openpty(None, None).unwrap();
    WindowSize::new(80, 24).apply(&tty.master).unwrap();
    let snapshot = TerminalSnapshot::capture(&tty.slave).unwrap();
    let runner = PtyRunner::new(Config::new("/nonexistent/ptywrap-target"));

    // warm up lazily opened descriptors (stdio locks, tracing, etc.)
    let _ = runner.run_with(&snapshot, ["x"], &mut Vec::new());
    let before = open_fds();

    for _ in 0..25 {
        let mut out = Vec::new();
        let err = runner.run_with(&snapshot, ["x"], &mut out).unwrap_err();
        assert!(matches!(err, Error::Spawn { .. }));
        assert!(out.is_empty());
    }

    assert_eq!(open_fds(), before);
}
