//! Assertions over envv process output and the files it leaves behind.

use std::path::Path;
use std::process::Output;

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn describe(output: &Output) -> String {
    format!(
        "exit: {:?}\n--- stdout ---\n{}\n--- stderr ---\n{}",
        output.status.code(),
        stdout(output),
        stderr(output)
    )
}

/// The command exited 0.
pub fn assert_success(output: &Output) {
    assert!(output.status.success(), "envv failed\n{}", describe(output));
}

/// The command exited non-zero.
pub fn assert_failure(output: &Output) {
    assert!(
        !output.status.success(),
        "envv unexpectedly succeeded\n{}",
        describe(output)
    );
}

pub fn assert_stderr_contains(output: &Output, needle: &str) {
    assert!(
        stderr(output).contains(needle),
        "expected '{}' on stderr\n{}",
        needle,
        describe(output)
    );
}

pub fn assert_stdout_contains(output: &Output, needle: &str) {
    assert!(
        stdout(output).contains(needle),
        "expected '{}' on stdout\n{}",
        needle,
        describe(output)
    );
}

/// No scratch directory survived under `root`.
pub fn assert_no_scratch(root: &Path) {
    let leftover: Vec<_> = std::fs::read_dir(root)
        .expect("scratch root unreadable")
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .collect();
    assert!(leftover.is_empty(), "plaintext scratch left behind: {:?}", leftover);
}

/// `path` is readable by its owner only.
pub fn assert_private(path: &Path) {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(path)
            .expect("missing file")
            .permissions()
            .mode()
            & 0o777;
        assert_eq!(mode, 0o600, "{} is {:o}, expected 600", path.display(), mode);
    }
    #[cfg(not(unix))]
    let _ = path;
}
