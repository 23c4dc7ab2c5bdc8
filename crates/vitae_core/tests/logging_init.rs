use vitae_core::{init_logging, logging_status};

// Logging state is process-global, so the whole lifecycle lives in one test.
#[test]
fn init_is_idempotent_and_rejects_conflicting_configs() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let dir_str = dir
        .path()
        .to_str()
        .expect("temp dir should be valid UTF-8")
        .to_string();
    let other = tempfile::tempdir().expect("temp dir should be created");
    let other_str = other
        .path()
        .to_str()
        .expect("temp dir should be valid UTF-8")
        .to_string();

    init_logging("info", &dir_str).expect("first init should succeed");
    init_logging("info", &dir_str).expect("same config should be a no-op");

    let level_conflict =
        init_logging("debug", &dir_str).expect_err("level conflict should be rejected");
    assert!(level_conflict.contains("refusing to switch"));

    let dir_conflict =
        init_logging("info", &other_str).expect_err("directory conflict should be rejected");
    assert!(dir_conflict.contains("refusing to switch"));

    let (level, active_dir) = logging_status().expect("logging should be active");
    assert_eq!(level, "info");
    assert_eq!(active_dir, dir.path());

    let log_files = std::fs::read_dir(dir.path())
        .expect("log dir should be readable")
        .count();
    assert!(log_files > 0, "a log file should have been created");
}

#[test]
fn bad_inputs_fail_without_touching_global_state_ordering() {
    assert!(init_logging("verbose", "/tmp/vitae-logs").is_err());
    assert!(init_logging("info", "relative/path").is_err());
    assert!(init_logging("info", "   ").is_err());
}
