//! Integration tests for the `qrcafe` CLI binary.
//!
//! Argument parsing, help, completions, and error exit codes run without a
//! backend. The rest drive the binary against a wiremock server.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `qrcafe` binary with env isolation.
///
/// Clears all `QRCAFE_*` env vars and points config directories at a temp
/// path so tests never touch the user's real configuration.
fn qrcafe_cmd(home: &std::path::Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("qrcafe");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("QRCAFE_PROFILE")
        .env_remove("QRCAFE_API_URL")
        .env_remove("QRCAFE_USER_ID")
        .env_remove("QRCAFE_API_TOKEN")
        .env_remove("QRCAFE_CACHE_URL")
        .env_remove("QRCAFE_TIMEOUT")
        .env_remove("QRCAFE_OUTPUT")
        .env_remove("RUST_LOG");
    cmd
}

fn isolated() -> (tempfile::TempDir, assert_cmd::Command) {
    let home = tempfile::tempdir().unwrap();
    let cmd = qrcafe_cmd(home.path());
    (home, cmd)
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

/// Run the binary off the async runtime so the mock server keeps serving.
async fn run(mut cmd: assert_cmd::Command) -> std::process::Output {
    tokio::task::spawn_blocking(move || cmd.output())
        .await
        .unwrap()
        .unwrap()
}

fn ok(data: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": data }))
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let (_home, mut cmd) = isolated();
    let output = cmd.output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    let (_home, mut cmd) = isolated();
    cmd.arg("--help").assert().success().stdout(
        predicate::str::contains("QR cafe menus")
            .and(predicate::str::contains("cafes"))
            .and(predicate::str::contains("categories"))
            .and(predicate::str::contains("products"))
            .and(predicate::str::contains("menu")),
    );
}

#[test]
fn test_version_flag() {
    let (_home, mut cmd) = isolated();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("qrcafe"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    let (_home, mut cmd) = isolated();
    cmd.args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    let (_home, mut cmd) = isolated();
    cmd.args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path_points_at_toml() {
    let (_home, mut cmd) = isolated();
    cmd.args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_show_no_config() {
    // `config show` renders the default config when no file exists.
    let (_home, mut cmd) = isolated();
    cmd.args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[defaults]"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let (_home, mut cmd) = isolated();
    let output = cmd.arg("foobar").output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_cafes_list_without_backend() {
    let (_home, mut cmd) = isolated();
    cmd.args(["cafes", "list"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No backend configured"));
}

#[test]
fn test_unknown_profile_lists_available() {
    let (_home, mut cmd) = isolated();
    cmd.args(["--profile", "staging", "cafes", "list"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("staging"));
}

#[test]
fn test_invalid_output_format() {
    let (_home, mut cmd) = isolated();
    let output = cmd
        .args(["--output", "invalid", "cafes", "list"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("invalid") || text.contains("possible values"),
        "Expected error about invalid output format:\n{text}"
    );
}

#[test]
fn test_reorder_needs_ids_or_move() {
    let (_home, mut cmd) = isolated();
    cmd.args(["--api-url", "http://127.0.0.1:9/api", "cafes", "reorder"])
        .assert()
        .code(2);
}

#[test]
fn test_reorder_rejects_ids_with_move() {
    let (_home, mut cmd) = isolated();
    cmd.args([
        "--api-url",
        "http://127.0.0.1:9/api",
        "categories",
        "reorder",
        "--cafe",
        "7",
        "--ids",
        "1,2",
        "--move",
        "1",
        "--to",
        "0",
    ])
    .assert()
    .code(2);
}

#[test]
fn test_non_numeric_id_is_usage_error() {
    let (_home, mut cmd) = isolated();
    cmd.args(["--api-url", "http://127.0.0.1:9/api", "products", "get", "abc"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("not a numeric id"));
}

#[test]
fn test_unreachable_backend_exit_code() {
    let (_home, mut cmd) = isolated();
    cmd.args([
        "--api-url",
        "http://127.0.0.1:9/api",
        "--timeout",
        "2s",
        "menu",
        "blue-door",
    ])
    .assert()
    .code(7);
}

// ── Against a backend ───────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_cafes_list_plain_in_display_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/cafes/user/5"))
        .respond_with(ok(json!([
            { "id": 2, "owner_id": 5, "name": "Harbor", "slug": "harbor", "sort_order": 1 },
            { "id": 8, "owner_id": 5, "name": "Blue Door", "slug": "blue-door", "sort_order": 0 }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let (_home, mut cmd) = isolated();
    cmd.args(["--api-url", &format!("{}/api", server.uri())])
        .args(["--user-id", "5", "-o", "plain", "cafes", "list"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "8\n2");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_cafes_list_without_user_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ok(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let (_home, mut cmd) = isolated();
    cmd.args(["--api-url", &format!("{}/api", server.uri()), "cafes", "list"]);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("user id"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_menu_json_hides_unavailable_products() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/menu/blue-door"))
        .respond_with(ok(json!({
            "cafe": { "id": 8, "owner_id": 5, "name": "Blue Door", "slug": "blue-door", "currency": "EUR" },
            "categories": [{
                "id": 1, "cafe_id": 8, "name": "Coffee", "sort_order": 0,
                "products": [
                    { "id": 9, "category_id": 1, "name": "Latte", "price": 3.5 },
                    { "id": 10, "category_id": 1, "name": "Sold Out Mocha", "price": 4.0, "is_available": false }
                ]
            }]
        })))
        .mount(&server)
        .await;

    let (_home, mut cmd) = isolated();
    cmd.args(["--api-url", &format!("{}/api", server.uri())])
        .args(["-o", "json", "menu", "blue-door"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let menu: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(menu["cafe"]["currency"], "EUR");
    assert_eq!(menu["sections"][0]["products"][0]["name"], "Latte");
    assert!(!stdout.contains("Sold Out Mocha"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_category_names_resource() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/categories/99"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({ "success": false, "error": "Category not found" })),
        )
        .mount(&server)
        .await;

    let (_home, mut cmd) = isolated();
    cmd.args(["--api-url", &format!("{}/api", server.uri())])
        .args(["categories", "get", "99"]);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(4));
    assert!(combined_output(&output).contains("category '99' not found"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_delete_without_yes_is_refused() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ok(json!(true)))
        .expect(0)
        .mount(&server)
        .await;

    let (_home, mut cmd) = isolated();
    cmd.args(["--api-url", &format!("{}/api", server.uri())])
        .args(["--user-id", "5", "cafes", "delete", "8"]);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("--yes"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_product_move_persists_new_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/products/category/1"))
        .respond_with(ok(json!([
            { "id": 3, "category_id": 1, "name": "Espresso", "price": 2.0, "sort_order": 0 },
            { "id": 1, "category_id": 1, "name": "Latte", "price": 3.5, "sort_order": 1 },
            { "id": 2, "category_id": 1, "name": "Mocha", "price": 4.0, "sort_order": 2 }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/products/sort-order"))
        .and(wiremock::matchers::body_json(
            json!({ "category_id": 1, "product_ids": [1, 2, 3] }),
        ))
        .respond_with(ok(json!(true)))
        .expect(1)
        .mount(&server)
        .await;

    let (_home, mut cmd) = isolated();
    cmd.args(["--api-url", &format!("{}/api", server.uri())])
        .args(["products", "reorder", "--category", "1", "--move", "3", "--to", "2"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert!(combined_output(&output).contains("Product order saved"));
}
