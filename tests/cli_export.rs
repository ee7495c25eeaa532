mod common;
use common::cli::{GcduWorkspace, UNREACHABLE_ENDPOINT, run_gcdu};

#[test]
fn test_export_unreachable_endpoint_fails_and_writes_nothing() {
    let workspace = GcduWorkspace::new();

    let output = run_gcdu(
        &workspace,
        [
            "export", "-p", "proj", "-n", "ns", "-k", "User,Order",
            "--endpoint", UNREACHABLE_ENDPOINT, "--timeout", "2", "--workers", "2",
        ],
        "export_unreachable",
    );

    assert!(!output.status.success());
    assert!(output.stdout.contains("Executing export."));
    assert!(output.stdout.contains("Failed. Kind=User"));
    assert!(output.stdout.contains("Failed. Kind=Order"));
    assert!(!workspace.data_dir().join("User.json").exists());
    assert!(!workspace.data_dir().join("Order.json").exists());
}

#[test]
fn test_export_rejects_bad_rewrite_mode() {
    let workspace = GcduWorkspace::new();

    let output = run_gcdu(
        &workspace,
        ["export", "-p", "proj", "-n", "ns", "-k", "User", "--rewrite-mode", "fuzzy"],
        "export_bad_mode",
    );

    assert!(!output.status.success());
    assert!(output.stderr.contains("Invalid rewrite mode"));
}

#[test]
fn test_missing_explicit_config_is_error() {
    let workspace = GcduWorkspace::new();

    let output = run_gcdu(
        &workspace,
        ["--config", "nope.yaml", "export", "-p", "proj", "-n", "ns", "-k", "User"],
        "export_missing_config",
    );

    assert!(!output.status.success());
    assert!(output.stderr.contains("Config file not found"));
}

#[test]
fn test_export_rejects_zero_timeout() {
    let workspace = GcduWorkspace::new();

    let output = run_gcdu(
        &workspace,
        ["export", "-p", "proj", "-n", "ns", "-k", "User", "--timeout", "0"],
        "export_zero_timeout",
    );

    assert!(!output.status.success());
    assert!(output.stderr.contains("timeout"));
    assert!(!workspace.data_dir().exists());
}
