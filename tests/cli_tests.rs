mod common;

use assert_cmd::Command;
use common::{MockServer, Route, SAVINGS_TYPES_BODY, SCENARIO_BODY};
use koperasi_ledger::client::{HISTORY_PATH, SAVINGS_TYPES_PATH};
use koperasi_ledger::FETCH_FAILED_MESSAGE;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn koperasi_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("koperasi"));
    cmd.env_remove("KOPERASI_API_URL").env_remove("KOPERASI_LOG");
    cmd
}

fn scenario_server() -> MockServer {
    MockServer::start(vec![
        Route::ok(SAVINGS_TYPES_PATH, SAVINGS_TYPES_BODY),
        Route::ok(HISTORY_PATH, SCENARIO_BODY),
    ])
}

#[test]
fn test_help() {
    koperasi_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Koperasi payment history viewer and exporter",
        ));
}

#[test]
fn test_version() {
    koperasi_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("koperasi"));
}

#[test]
fn test_init_creates_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("koperasi-config");

    koperasi_cmd()
        .args(["-C", config_path.to_str().unwrap(), "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized koperasi config"));

    assert!(config_path.join("config.toml").exists());
}

#[test]
fn test_init_fails_if_exists() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("koperasi-config");

    koperasi_cmd()
        .args(["-C", config_path.to_str().unwrap(), "init"])
        .assert()
        .success();

    koperasi_cmd()
        .args(["-C", config_path.to_str().unwrap(), "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_history_without_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("nonexistent");

    koperasi_cmd()
        .args(["-C", config_path.to_str().unwrap(), "history"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_status_shows_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("koperasi-config");

    koperasi_cmd()
        .args(["-C", config_path.to_str().unwrap(), "init"])
        .assert()
        .success();

    koperasi_cmd()
        .args(["-C", config_path.to_str().unwrap(), "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Koperasi Status"))
        .stdout(predicate::str::contains("https://koperasi.example.id"))
        .stdout(predicate::str::contains("transaksi_sukses_koperasi.xlsx"));
}

#[test]
fn test_history_scenario_renders_total() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("nonexistent");
    let server = scenario_server();

    koperasi_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "--base-url",
            server.base_url.as_str(),
            "history",
            "--search",
            "Budi",
            "--status",
            "sukses",
            "--jenis",
            "3",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total Transaksi Sukses: Rp50.000"))
        .stdout(predicate::str::contains("✔ SUKSES"))
        .stdout(predicate::str::contains("Jenis Simpanan: Simpanan Wajib"))
        .stdout(predicate::str::contains("Transfer (BRI)"));

    assert!(server
        .requests()
        .contains(&"/api/history-pembayaran-all?search=Budi&status=SUKSES&jenis_simpanan_id=3".to_string()));
}

#[test]
fn test_history_uses_config_file_base_url() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("koperasi-config");
    let server = scenario_server();

    fs::create_dir_all(&config_path).unwrap();
    fs::write(
        config_path.join("config.toml"),
        format!("[api]\nbase_url = \"{}\"\n", server.base_url),
    )
    .unwrap();

    koperasi_cmd()
        .args(["-C", config_path.to_str().unwrap(), "history"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Budi"))
        .stdout(predicate::str::contains("Total Transaksi Sukses").not());
}

#[test]
fn test_history_fetch_failure_shows_error_panel() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("nonexistent");
    let base_url = common::closed_base_url();

    koperasi_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "--base-url",
            base_url.as_str(),
            "history",
        ])
        .assert()
        .failure()
        .stdout(predicate::str::contains(FETCH_FAILED_MESSAGE))
        .stderr(predicate::str::contains("could not be loaded"));
}

#[test]
fn test_history_invalid_status() {
    koperasi_cmd()
        .args(["--base-url", "http://127.0.0.1:1", "history", "--status", "lunas"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid status 'lunas'"));
}

#[test]
fn test_export_requires_success_filter() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("nonexistent");
    let server = scenario_server();

    koperasi_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "--base-url",
            server.base_url.as_str(),
            "history",
            "--export",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("only available while filtering"));

    assert!(server.requests().is_empty());
}

#[test]
fn test_export_writes_workbook() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("nonexistent");
    let output = temp_dir.path().join("sukses.xlsx");
    let server = scenario_server();

    koperasi_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "--base-url",
            server.base_url.as_str(),
            "history",
            "--status",
            "sukses",
            "--export",
            "--output",
            output.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 1 transaction(s)"));

    assert!(output.exists());
}

#[test]
fn test_types_lists_savings_types() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("nonexistent");
    let server = scenario_server();

    koperasi_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "--base-url",
            server.base_url.as_str(),
            "types",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Simpanan Pokok"))
        .stdout(predicate::str::contains("Simpanan Wajib"));
}

#[test]
fn test_watch_session_over_stdin() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("nonexistent");
    let server = scenario_server();

    koperasi_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "--base-url",
            server.base_url.as_str(),
            "watch",
        ])
        .write_stdin("status sukses\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Riwayat Pembayaran"))
        .stdout(predicate::str::contains("Total Transaksi Sukses: Rp50.000"));
}
