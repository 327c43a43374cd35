use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use tempfile::TempDir;

fn libro(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("libro").unwrap();
    cmd.env("LIBRO_DATA_DIR", home.path())
        .env_remove("LIBRO_LOG")
        .env_remove("GEMINI_API_KEY");
    cmd
}

fn init(home: &TempDir) {
    libro(home)
        .arg("init")
        .assert()
        .success()
        .stdout(contains("Initialization complete"));
}

#[test]
fn init_creates_config_and_tax_table() {
    let home = TempDir::new().unwrap();
    init(&home);

    assert!(home.path().join("config.json").exists());
    libro(&home)
        .args(["tax", "configs"])
        .assert()
        .success()
        .stdout(contains("IVA").and(contains("21.00%")));
}

#[test]
fn journal_add_and_list() {
    let home = TempDir::new().unwrap();
    init(&home);

    libro(&home)
        .args([
            "journal", "add", "Cash sale", "1000", "-d", "acc_bank", "-c", "Ventas", "--date",
            "2025-03-10",
        ])
        .assert()
        .success()
        .stdout(contains("Recorded entry").and(contains("$1000.00")));

    libro(&home)
        .args(["journal", "list"])
        .assert()
        .success()
        .stdout(contains("Cash sale").and(contains("1 entry")));

    libro(&home)
        .args(["report", "trial-balance"])
        .assert()
        .success()
        .stdout(contains("acc_sales").and(contains("Debits and credits agree")));
}

#[test]
fn unbalanced_compound_entry_is_rejected() {
    let home = TempDir::new().unwrap();
    init(&home);

    libro(&home)
        .args([
            "journal",
            "compound",
            "Opening balance",
            "--debit",
            "acc_cash=200",
            "--debit",
            "acc_bank=800",
            "--credit",
            "acc_capital=900",
        ])
        .assert()
        .failure()
        .stderr(contains("not balanced"));

    libro(&home)
        .args([
            "journal",
            "compound",
            "Opening balance",
            "--debit",
            "acc_cash=200",
            "--debit",
            "acc_bank=800",
            "--credit",
            "acc_capital=1000",
        ])
        .assert()
        .success()
        .stdout(contains("Recorded compound entry"));

    libro(&home)
        .args(["journal", "list"])
        .assert()
        .success()
        .stdout(contains("1 entry"));
}

#[test]
fn partner_invoice_updates_balance() {
    let home = TempDir::new().unwrap();
    init(&home);

    libro(&home)
        .args(["partner", "add", "Acme", "--credit-days", "30"])
        .assert()
        .success()
        .stdout(contains("Acme"));

    libro(&home)
        .args(["partner", "record", "Acme", "invoice", "500", "--date", "2025-03-01"])
        .assert()
        .success()
        .stdout(contains("Due: 2025-03-31").and(contains("Balance: $500.00")));

    libro(&home)
        .args(["partner", "record", "Acme", "payment", "200", "--date", "2025-03-15"])
        .assert()
        .success()
        .stdout(contains("Balance: $300.00"));
}

#[test]
fn export_then_restore_into_fresh_books() {
    let source = TempDir::new().unwrap();
    init(&source);
    libro(&source)
        .args([
            "journal", "add", "Rent", "700", "-d", "acc_rent", "-c", "acc_bank", "--date",
            "2025-02-01",
        ])
        .assert()
        .success();

    let export_path = source.path().join("books.json");
    libro(&source)
        .args(["export", "all"])
        .arg(&export_path)
        .assert()
        .success()
        .stdout(contains("exported to"));

    let target = TempDir::new().unwrap();
    init(&target);
    libro(&target)
        .arg("import")
        .arg(&export_path)
        .assert()
        .success()
        .stdout(contains("Restored 1 journal entries"));

    libro(&target)
        .args(["journal", "list"])
        .assert()
        .success()
        .stdout(contains("Rent"));

    // The books are no longer empty, so a second restore needs --force
    libro(&target)
        .arg("import")
        .arg(&export_path)
        .assert()
        .failure()
        .stderr(contains("--force"));
}

#[test]
fn config_updates_settings() {
    let home = TempDir::new().unwrap();
    libro(&home)
        .args(["config", "--business-name", "Almacén Sur", "--upcoming-days", "15"])
        .assert()
        .success()
        .stdout(contains("Almacén Sur").and(contains("15 days")));

    libro(&home)
        .arg("config")
        .assert()
        .success()
        .stdout(contains("Almacén Sur"));
}
