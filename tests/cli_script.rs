mod common;

use common::{script_command, spawn_backend, Backend};
use predicates::str::contains;
use tempfile::TempDir;

#[test]
fn offline_session_adds_and_lists() {
    let dir = TempDir::new().unwrap();
    script_command(&dir)
        .env("TALLY_OFFLINE", "1")
        .write_stdin("add Salaire revenue 50000 2024-01-05\nlist\nexit\n")
        .assert()
        .success()
        .stdout(contains("Created transaction 1 (Salaire)"))
        .stdout(contains("REVENUE"))
        .stdout(contains("2024-01-05"))
        .stdout(contains("Balance: 50000 FCFA"));
}

#[test]
fn digits_in_description_are_refused() {
    let dir = TempDir::new().unwrap();
    script_command(&dir)
        .env("TALLY_OFFLINE", "1")
        .write_stdin("add 123 depense 20 2024-01-06\nlist\n")
        .assert()
        .success()
        .stdout(contains("Description may only contain letters"))
        .stdout(contains("Nothing was sent"))
        .stdout(contains("No transactions recorded."));
}

#[test]
fn deleting_unknown_id_reports_and_continues() {
    let dir = TempDir::new().unwrap();
    script_command(&dir)
        .env("TALLY_OFFLINE", "1")
        .write_stdin("delete 42\nbalance\n")
        .assert()
        .success()
        .stdout(contains("Backend request failed"))
        .stdout(contains("Balance: 0 FCFA"));
}

#[test]
fn typo_gets_a_suggestion() {
    let dir = TempDir::new().unwrap();
    script_command(&dir)
        .env("TALLY_OFFLINE", "1")
        .write_stdin("lsit\n")
        .assert()
        .success()
        .stdout(contains("Unknown command `lsit`"))
        .stdout(contains("Did you mean `list`?"));
}

#[test]
fn question_mark_is_an_alias_for_help() {
    let dir = TempDir::new().unwrap();
    script_command(&dir)
        .env("TALLY_OFFLINE", "1")
        .write_stdin("?\n? delete\n")
        .assert()
        .success()
        .stdout(contains("Available commands"))
        .stdout(contains("Usage: delete <id>"));
}

#[test]
fn version_prints_package_version() {
    let dir = TempDir::new().unwrap();
    script_command(&dir)
        .env("TALLY_OFFLINE", "1")
        .write_stdin("version\n")
        .assert()
        .success()
        .stdout(contains(format!("Tally {}", env!("CARGO_PKG_VERSION"))))
        .stdout(contains("Build hash"));
}

#[test]
fn config_changes_are_persisted() {
    let dir = TempDir::new().unwrap();
    script_command(&dir)
        .env("TALLY_OFFLINE", "1")
        .write_stdin("config set currency_label EUR\nbalance\nconfig show\n")
        .assert()
        .success()
        .stdout(contains("Balance: 0 EUR"))
        .stdout(contains("currency_label"));

    let saved = std::fs::read_to_string(dir.path().join("config").join("config.json")).unwrap();
    assert!(saved.contains("\"EUR\""));
}

#[test]
fn rest_session_round_trips_through_backend() {
    let backend = Backend::default();
    backend.seed("Loyer", "DEPENSE", 400.0, "2024-01-02");
    let origin = spawn_backend(backend.clone());
    let dir = TempDir::new().unwrap();

    script_command(&dir)
        .env("TALLY_API_URL", &origin)
        .write_stdin("add Salaire revenue 1000 2024-01-05\nedit 1 amount 450\nlist\n")
        .assert()
        .success()
        .stdout(contains("Loaded 1 transaction(s)."))
        .stdout(contains("Created transaction 2 (Salaire)"))
        .stdout(contains("Updated transaction 1 (Loyer)"))
        .stdout(contains("Balance: 550 FCFA"));

    let rows = backend.rows();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["amount"], 450.0);
    assert_eq!(rows[0]["date"], "2024-01-02T00:00:00.000+00:00");
    assert_eq!(rows[1]["type"], "REVENUE");
    assert_eq!(rows[1]["description"], "Salaire");
}

#[test]
fn remote_balance_source_uses_backend_total() {
    let backend = Backend::default();
    backend.seed("Prime", "REVENUE", 300.0, "2024-01-03");
    let origin = spawn_backend(backend);
    let dir = TempDir::new().unwrap();

    script_command(&dir)
        .env("TALLY_API_URL", &origin)
        .write_stdin("config set balance_source remote\n")
        .assert()
        .success()
        .stdout(contains("Restart tally"));

    script_command(&dir)
        .env("TALLY_API_URL", &origin)
        .write_stdin("balance\ndelete 1\nbalance\n")
        .assert()
        .success()
        .stdout(contains("Balance: 300 FCFA"))
        .stdout(contains("Deleted transaction 1."))
        .stdout(contains("Balance: 0 FCFA"));
}

#[test]
fn unreachable_backend_is_not_fatal() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let dir = TempDir::new().unwrap();

    script_command(&dir)
        .env("TALLY_API_URL", format!("http://{addr}"))
        .write_stdin("list\nadd Salaire revenue 10 2024-01-05\ndraft\n")
        .assert()
        .success()
        .stdout(contains("Backend request failed").count(2))
        .stdout(contains("No transactions recorded."))
        .stdout(contains("\"description\": \"Salaire\""));
}

#[test]
fn invalid_backend_url_fails_at_startup() {
    let dir = TempDir::new().unwrap();
    script_command(&dir)
        .env("TALLY_API_URL", "ftp://example.invalid")
        .write_stdin("list\n")
        .assert()
        .failure()
        .stderr(contains("Error:"));
}
