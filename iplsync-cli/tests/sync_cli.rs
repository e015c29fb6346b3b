//! `iplsync sync` against a stubbed feed and policy engine.

mod support;

use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;

use support::{iplsync_cmd, Recorded, Stub, FEED, FEED_PATH};

const DRAFT_LISTS: &str = "/api/v2/orgs/1/sec_policy/draft/ip_lists";
const ACTIVE_LISTS: &str = "/api/v2/orgs/1/sec_policy/active/ip_lists";
const PROVISION: &str = "/api/v2/orgs/1/sec_policy";

/// Routes shared by most tests; `active` is the active-namespace inventory body.
fn policy_engine(active: &'static str, feed: &'static str) -> Stub {
    Stub::start(move |req: &Recorded| match (req.method.as_str(), req.path.as_str()) {
        ("GET", FEED_PATH) => (200, feed.to_string()),
        ("GET", DRAFT_LISTS) => (200, "[]".to_string()),
        ("GET", ACTIVE_LISTS) => (200, active.to_string()),
        ("POST", DRAFT_LISTS) => {
            let mut created = req.json();
            created["href"] = json!("/orgs/1/sec_policy/draft/ip_lists/42");
            (201, created.to_string())
        }
        ("PUT", path) if path.starts_with(DRAFT_LISTS) => (204, String::new()),
        ("POST", PROVISION) => (201, r#"{"href":"/orgs/1/sec_policy/17"}"#.to_string()),
        _ => (404, r#"{"error":"not found"}"#.to_string()),
    })
}

fn sync_cmd(home: &Path, stub: &Stub) -> Command {
    let mut cmd = iplsync_cmd(home);
    cmd.args([
        "sync",
        "--fqdn",
        "http://127.0.0.1",
        "--port",
        &stub.addr.port().to_string(),
        "--user",
        "api_1a2b3c",
        "--pwd",
        "s3cret",
        "--feed-url",
        &stub.base_url(),
    ]);
    cmd
}

fn policy_calls(stub: &Stub) -> Vec<Recorded> {
    stub.requests()
        .into_iter()
        .filter(|r| r.path.starts_with("/api/v2"))
        .collect()
}

// ---------------------------------------------------------------------------
// 1. Input validation
// ---------------------------------------------------------------------------

#[test]
fn missing_credentials_abort_before_network() {
    let home = TempDir::new().expect("home");
    let stub = policy_engine("[]", FEED);

    iplsync_cmd(home.path())
        .args(["sync", "--fqdn", "http://127.0.0.1", "--user", "api_1"])
        .args(["--feed-url", &stub.base_url()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("required arguments not included"))
        .stderr(predicate::str::contains("pwd"));

    assert!(stub.requests().is_empty(), "no request may be sent");
}

// ---------------------------------------------------------------------------
// 2. Create path
// ---------------------------------------------------------------------------

#[test]
fn creates_list_with_deduplicated_feed_addresses() {
    let home = TempDir::new().expect("home");
    let stub = policy_engine("[]", FEED);

    sync_cmd(home.path(), &stub)
        .assert()
        .success()
        .stdout(predicate::str::contains("IP List 'Office365' created (3 entries)"))
        .stdout(predicate::str::contains("provisioned").not());

    let feed = stub.find("GET", FEED_PATH);
    assert_eq!(feed.len(), 1);
    assert!(feed[0].query.starts_with("clientrequestid="), "{}", feed[0].query);

    let creates = stub.find("POST", DRAFT_LISTS);
    assert_eq!(creates.len(), 1);
    assert_eq!(
        creates[0].json(),
        json!({
            "name": "Office365",
            "ip_ranges": [
                {"from_ip": "13.107.6.152/31"},
                {"from_ip": "13.107.18.10/31"},
                {"from_ip": "2603:1006::/40"}
            ]
        })
    );
    assert_eq!(
        creates[0].authorization.as_deref(),
        Some("Basic YXBpXzFhMmIzYzpzM2NyZXQ=")
    );
    assert!(stub.find("POST", PROVISION).is_empty());
}

#[test]
fn provision_flag_provisions_created_list() {
    let home = TempDir::new().expect("home");
    let stub = policy_engine("[]", FEED);

    sync_cmd(home.path(), &stub)
        .arg("-p")
        .assert()
        .success()
        .stdout(predicate::str::contains("created"))
        .stdout(predicate::str::contains("IP List 'Office365' provisioned"));

    let provisions = stub.find("POST", PROVISION);
    assert_eq!(provisions.len(), 1);
    assert_eq!(
        provisions[0].json()["change_subset"]["ip_lists"],
        json!([{"href": "/orgs/1/sec_policy/draft/ip_lists/42"}])
    );
}

#[test]
fn custom_name_and_empty_feed_still_create() {
    let home = TempDir::new().expect("home");
    let stub = policy_engine("[]", "[]");

    sync_cmd(home.path(), &stub)
        .args(["--name", "M365-Optimize"])
        .assert()
        .success()
        .stdout(predicate::str::contains("'M365-Optimize' created (0 entries)"));

    let creates = stub.find("POST", DRAFT_LISTS);
    assert_eq!(creates[0].json(), json!({"name": "M365-Optimize", "ip_ranges": []}));
}

// ---------------------------------------------------------------------------
// 3. Update path
// ---------------------------------------------------------------------------

const ACTIVE_OFFICE365: &str = r#"[
  {"href": "/orgs/1/sec_policy/active/ip_lists/5", "name": "Office365",
   "ip_ranges": [{"from_ip": "192.0.2.0/24", "exclusion": false}], "created_by": {"href": "/users/1"}},
  {"href": "/orgs/1/sec_policy/active/ip_lists/6", "name": "Any (0.0.0.0/0 and ::/0)",
   "ip_ranges": [{"from_ip": "0.0.0.0/0"}, {"from_ip": "::/0"}]}
]"#;

#[test]
fn existing_active_list_is_replaced_through_its_draft() {
    let home = TempDir::new().expect("home");
    let stub = policy_engine(ACTIVE_OFFICE365, FEED);

    sync_cmd(home.path(), &stub)
        .arg("--provision")
        .assert()
        .success()
        .stdout(predicate::str::contains("IP List 'Office365' updated (3 entries)"))
        .stdout(predicate::str::contains("provisioned"));

    assert!(stub.find("POST", DRAFT_LISTS).is_empty(), "must not create");
    let updates = stub.find("PUT", "/api/v2/orgs/1/sec_policy/draft/ip_lists/5");
    assert_eq!(updates.len(), 1);
    let body = updates[0].json();
    assert_eq!(body["name"], "Office365");
    assert_eq!(body["ip_ranges"].as_array().map(Vec::len), Some(3));
    assert!(body.get("href").is_none());

    let provisions = stub.find("POST", PROVISION);
    assert_eq!(
        provisions[0].json()["change_subset"]["ip_lists"],
        json!([{"href": "/orgs/1/sec_policy/draft/ip_lists/5"}])
    );
}

// ---------------------------------------------------------------------------
// 4. Failures and dry run
// ---------------------------------------------------------------------------

#[test]
fn malformed_feed_fails_without_touching_policy_engine() {
    let home = TempDir::new().expect("home");
    let stub = policy_engine("[]", "<html>Service Unavailable</html>");

    sync_cmd(home.path(), &stub)
        .arg("-p")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to decode endpoint feed"));

    assert!(policy_calls(&stub).is_empty());
}

#[test]
fn rejected_write_names_the_stage() {
    let home = TempDir::new().expect("home");
    let stub = Stub::start(|req: &Recorded| match (req.method.as_str(), req.path.as_str()) {
        ("GET", FEED_PATH) => (200, FEED.to_string()),
        ("GET", _) => (200, "[]".to_string()),
        _ => (406, r#"[{"token":"invalid_ip_range"}]"#.to_string()),
    });

    sync_cmd(home.path(), &stub)
        .arg("-p")
        .assert()
        .failure()
        .stderr(predicate::str::contains("creating IP list failed"))
        .stderr(predicate::str::contains("invalid_ip_range"));

    assert!(stub.find("POST", PROVISION).is_empty());
}

#[test]
fn dry_run_reads_inventory_but_never_writes() {
    let home = TempDir::new().expect("home");
    let stub = policy_engine(ACTIVE_OFFICE365, FEED);

    sync_cmd(home.path(), &stub)
        .args(["--dry-run", "-p"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[dry-run] IP List 'Office365' would be updated"))
        .stdout(predicate::str::contains("would be provisioned"));

    assert_eq!(stub.find("GET", DRAFT_LISTS).len(), 1);
    assert_eq!(stub.find("GET", ACTIVE_LISTS).len(), 1);
    assert!(policy_calls(&stub).iter().all(|r| r.method == "GET"));
}

// ---------------------------------------------------------------------------
// 5. Configuration sources
// ---------------------------------------------------------------------------

#[test]
fn settings_from_config_file_and_env() {
    let home = TempDir::new().expect("home");
    let stub = policy_engine("[]", FEED);
    let config = home.path().join("iplsync.yaml");
    std::fs::write(
        &config,
        format!(
            "fqdn: http://127.0.0.1\nport: {}\nuser: api_1a2b3c\nfeed_url: {}\nname: FromFile\n",
            stub.addr.port(),
            stub.base_url()
        ),
    )
    .expect("write config");

    iplsync_cmd(home.path())
        .env("IPLSYNC_PCE_PWD", "s3cret")
        .args(["sync", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("'FromFile' created"));

    let creates = stub.find("POST", DRAFT_LISTS);
    assert_eq!(
        creates[0].authorization.as_deref(),
        Some("Basic YXBpXzFhMmIzYzpzM2NyZXQ=")
    );
}

#[test]
fn email_login_exchanges_credentials_for_session() {
    let home = TempDir::new().expect("home");
    let stub = Stub::start(|req: &Recorded| match (req.method.as_str(), req.path.as_str()) {
        ("GET", FEED_PATH) => (200, FEED.to_string()),
        ("POST", "/api/v2/login_users/authenticate") => {
            (200, r#"{"auth_token":"tok-1"}"#.to_string())
        }
        ("GET", "/api/v2/users/login") => (
            200,
            r#"{"auth_username":"user_7","session_token":"sess-9","orgs":[{"org_id":3}]}"#
                .to_string(),
        ),
        ("GET", "/api/v2/orgs/3/sec_policy/draft/ip_lists") => (200, "[]".to_string()),
        ("GET", "/api/v2/orgs/3/sec_policy/active/ip_lists") => (200, "[]".to_string()),
        ("POST", "/api/v2/orgs/3/sec_policy/draft/ip_lists") => (
            201,
            r#"{"href":"/orgs/3/sec_policy/draft/ip_lists/1","name":"Office365"}"#.to_string(),
        ),
        _ => (404, "{}".to_string()),
    });

    iplsync_cmd(home.path())
        .args(["sync", "--fqdn", "http://127.0.0.1", "--port"])
        .arg(stub.addr.port().to_string())
        .args(["--user", "ops@example.com", "--pwd", "hunter2", "--feed-url"])
        .arg(stub.base_url())
        .assert()
        .success()
        .stdout(predicate::str::contains("created"));

    let auth = stub.find("POST", "/api/v2/login_users/authenticate");
    assert_eq!(auth.len(), 1);
    assert_eq!(auth[0].query, "pce_fqdn=127.0.0.1");

    let login = stub.find("GET", "/api/v2/users/login");
    assert_eq!(login[0].authorization.as_deref(), Some("Token token=tok-1"));

    let creates = stub.find("POST", "/api/v2/orgs/3/sec_policy/draft/ip_lists");
    assert_eq!(creates.len(), 1);
    // base64("user_7:sess-9")
    assert_eq!(
        creates[0].authorization.as_deref(),
        Some("Basic dXNlcl83OnNlc3MtOQ==")
    );
}
