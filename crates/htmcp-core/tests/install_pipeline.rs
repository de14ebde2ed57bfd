//! End-to-end install pipeline against a mock release server.

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use htmcp_core::{InstallError, InstallPlan, Installer, NullReporter, verify_installed};
use htmcp_schema::{Recipe, Sha256Digest};
use mockito::Server;

// Installs exec freshly written files; see smoke.rs for why these are serialized.
static EXEC_LOCK: tokio::sync::Mutex<()> = tokio::sync::Mutex::const_new(());

const GOOD_BINARY: &str = "#!/bin/sh\necho \"ht-mcp 0.1.0\"\n";
const STALE_BINARY: &str = "#!/bin/sh\necho \"ht-mcp 0.0.9\"\n";

fn recipe(base_url: &str, digest: &str) -> Recipe {
    Recipe::parse(&format!(
        r#"
[package]
name = "ht-mcp"

[release]
version = "0.1.0"
base_url = "{base_url}"

[release.artifacts.macos-arm64]
name = "ht-mcp-aarch64-apple-darwin"
sha256 = "{digest}"

[release.artifacts.macos-x86_64]
name = "ht-mcp-x86_64-apple-darwin"
sha256 = "{digest}"

[release.artifacts.linux-x86_64]
name = "ht-mcp-x86_64-unknown-linux-gnu"
sha256 = "{digest}"
"#
    ))
    .unwrap()
}

fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_macos_arm64_end_to_end() {
    let _guard = EXEC_LOCK.lock().await;
    let mut server = Server::new_async().await;
    let m = server
        .mock("GET", "/v0.1.0/ht-mcp-aarch64-apple-darwin")
        .with_status(200)
        .with_body(GOOD_BINARY)
        .expect(1)
        .create_async()
        .await;

    let digest = Sha256Digest::compute(GOOD_BINARY.as_bytes());
    let recipe = recipe(&server.url(), digest.as_str());
    let bin = tempfile::tempdir().unwrap();

    let plan = InstallPlan::for_platform(&recipe, "macos", "aarch64", bin.path()).unwrap();
    assert_eq!(plan.target, bin.path().join("ht-mcp"));

    let client = reqwest::Client::new();
    let installed = Installer::new(&client, &NullReporter)
        .install(&plan)
        .await
        .unwrap();

    m.assert_async().await;
    assert_eq!(installed.path, bin.path().join("ht-mcp"));
    assert_eq!(installed.digest, digest);
    assert!(installed.version_output.contains("0.1.0"));

    let mode = std::fs::metadata(&installed.path).unwrap().permissions().mode();
    assert_eq!(mode & 0o111, 0o111);
    assert_eq!(
        Sha256Digest::compute_file(&installed.path).unwrap(),
        digest
    );

    // The formula-style re-test works against the same plan.
    assert!(verify_installed(&plan).await.unwrap().contains("ht-mcp 0.1.0"));
}

#[tokio::test]
async fn test_unsupported_platform_makes_no_request() {
    let _guard = EXEC_LOCK.lock().await;
    let mut server = Server::new_async().await;
    let m = server
        .mock("GET", mockito::Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let recipe = recipe(&server.url(), "00");
    let bin = tempfile::tempdir().unwrap();

    let err = InstallPlan::for_platform(&recipe, "windows", "x86_64", bin.path()).unwrap_err();
    assert!(matches!(err, InstallError::UnsupportedPlatform { .. }));
    assert_eq!(err.exit_code(), 3);

    m.assert_async().await;
    assert!(dir_entries(bin.path()).is_empty());
}

#[tokio::test]
async fn test_integrity_mismatch_writes_nothing() {
    let _guard = EXEC_LOCK.lock().await;
    let mut server = Server::new_async().await;

    // Server hands out a tampered artifact: one bit flipped.
    let mut tampered = GOOD_BINARY.as_bytes().to_vec();
    tampered[12] ^= 0x01;
    let _m = server
        .mock("GET", "/v0.1.0/ht-mcp-x86_64-unknown-linux-gnu")
        .with_status(200)
        .with_body(tampered)
        .create_async()
        .await;

    let digest = Sha256Digest::compute(GOOD_BINARY.as_bytes());
    let recipe = recipe(&server.url(), digest.as_str());
    let bin = tempfile::tempdir().unwrap();
    let plan = InstallPlan::for_platform(&recipe, "linux", "x86_64", bin.path()).unwrap();

    let client = reqwest::Client::new();
    let err = Installer::new(&client, &NullReporter)
        .install(&plan)
        .await
        .unwrap_err();

    assert!(matches!(err, InstallError::IntegrityMismatch { .. }));
    assert!(!plan.target.exists());
    assert!(dir_entries(bin.path()).is_empty());
}

#[tokio::test]
async fn test_placeholder_digest_is_enforced() {
    let _guard = EXEC_LOCK.lock().await;
    let mut server = Server::new_async().await;
    let _m = server
        .mock("GET", "/v0.1.0/ht-mcp-x86_64-apple-darwin")
        .with_status(200)
        .with_body(GOOD_BINARY)
        .create_async()
        .await;

    let recipe = recipe(&server.url(), "YOUR_X86_64_SHA256_HERE");
    let bin = tempfile::tempdir().unwrap();
    let plan = InstallPlan::for_platform(&recipe, "macos", "x86_64", bin.path()).unwrap();

    let client = reqwest::Client::new();
    let err = Installer::new(&client, &NullReporter)
        .install(&plan)
        .await
        .unwrap_err();
    assert_eq!(err.stage().label(), "integrity");
    assert!(!plan.target.exists());
}

#[tokio::test]
async fn test_reinstall_is_idempotent() {
    let _guard = EXEC_LOCK.lock().await;
    let mut server = Server::new_async().await;
    let _m = server
        .mock("GET", "/v0.1.0/ht-mcp-x86_64-unknown-linux-gnu")
        .with_status(200)
        .with_body(GOOD_BINARY)
        .expect(2)
        .create_async()
        .await;

    let digest = Sha256Digest::compute(GOOD_BINARY.as_bytes());
    let recipe = recipe(&server.url(), digest.as_str());
    let bin = tempfile::tempdir().unwrap();
    let plan = InstallPlan::for_platform(&recipe, "linux", "x86_64", bin.path()).unwrap();

    let client = reqwest::Client::new();
    let installer = Installer::new(&client, &NullReporter);
    let first = installer.install(&plan).await.unwrap();
    let second = installer.install(&plan).await.unwrap();

    assert_eq!(first.digest, second.digest);
    assert_eq!(Sha256Digest::compute_file(&plan.target).unwrap(), digest);
    assert_eq!(dir_entries(bin.path()), vec!["ht-mcp"]);
}

#[tokio::test]
async fn test_stale_binary_fails_verification() {
    let _guard = EXEC_LOCK.lock().await;
    let mut server = Server::new_async().await;
    let _m = server
        .mock("GET", "/v0.1.0/ht-mcp-aarch64-apple-darwin")
        .with_status(200)
        .with_body(STALE_BINARY)
        .create_async()
        .await;

    // Digest matches the stale artifact, so only the smoke test can catch it.
    let digest = Sha256Digest::compute(STALE_BINARY.as_bytes());
    let recipe = recipe(&server.url(), digest.as_str());
    let bin = tempfile::tempdir().unwrap();
    let plan = InstallPlan::for_platform(&recipe, "macos", "arm64", bin.path()).unwrap();

    let client = reqwest::Client::new();
    let err = Installer::new(&client, &NullReporter)
        .install(&plan)
        .await
        .unwrap_err();

    assert!(matches!(err, InstallError::VerificationFailed { .. }));
    assert_eq!(err.exit_code(), 7);
}

#[tokio::test]
async fn test_fetch_failure_is_reported_as_fetch() {
    let _guard = EXEC_LOCK.lock().await;
    let mut server = Server::new_async().await;
    let _m = server
        .mock("GET", "/v0.1.0/ht-mcp-aarch64-apple-darwin")
        .with_status(503)
        .create_async()
        .await;

    let recipe = recipe(&server.url(), "00");
    let bin = tempfile::tempdir().unwrap();
    let plan = InstallPlan::for_platform(&recipe, "macos", "aarch64", bin.path()).unwrap();

    let client = reqwest::Client::new();
    let err = Installer::new(&client, &NullReporter)
        .install(&plan)
        .await
        .unwrap_err();
    assert_eq!(err.stage().label(), "fetch");
    assert!(dir_entries(bin.path()).is_empty());
}
