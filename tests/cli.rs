//! Startup behaviour of the server binary.
//!
//! Run with: cargo test --test cli

use std::process::Command;

fn server() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_chart-data-server"));
    command.env_remove("RUST_LOG");
    command
}

#[test]
fn missing_config_file_is_logged_and_exits_non_zero() {
    let output = server()
        .args(["--config", "/nonexistent/chart-data.toml", "--log-level", "info"])
        .output()
        .expect("Failed to run server binary");

    assert!(!output.status.success());
    let logs = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(
        logs.contains("Failed to load configuration"),
        "logs were: {}",
        logs
    );
}

#[test]
fn invalid_port_is_logged_and_exits_non_zero() {
    let output = server()
        .env("PORT", "not-a-port")
        .args(["--log-level", "info"])
        .output()
        .expect("Failed to run server binary");

    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Failed to load configuration"), "stdout was: {}", stdout);
    assert!(stdout.contains("PORT"), "stdout was: {}", stdout);
}
