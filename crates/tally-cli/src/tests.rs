//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::path::PathBuf;

use clap::Parser;

use rust_decimal_macros::dec;
use tally_core::{AccountingMonth, Cache, Config, Day, PayeeCategory, PeriodSummary, VatSummary};

use crate::cli::{Cli, Commands};
use crate::commands::{self, format_amount, truncate, Session};

const STATEMENT: &str = "account,date,ftid,type,payee,amount,balance
40123456,2023-04-01,T001,FPO,PAULINE LE DIVENAC SALARY,-1200.00,8800.00
40123456,2023-04-02,T002,BGC,STRIPE PAYOUT,45.00,8845.00
40123456,2023-04-17,T003,DD,HMRC VAT 123456,-500.00,8345.00
40123456,2023-04-20,T004,DEB,CORNER SHOP LTD,-9.99,8335.01
";

fn setup_session() -> Session {
    Session::new(Config::default(), Cache::in_memory().unwrap(), false).unwrap()
}

fn write_statement(dir: &tempfile::TempDir) -> PathBuf {
    let path = dir.path().join("statement.csv");
    std::fs::write(&path, STATEMENT).unwrap();
    path
}

// ========== Helper Tests ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("STRIPE PAYOUT", 20), "STRIPE PAYOUT");
    assert_eq!(truncate("PAULINE LE DIVENAC SALARY", 10), "PAULINE...");
    assert_eq!(truncate("££££££", 5), "££...");
}

#[test]
fn test_format_amount() {
    assert_eq!(format_amount(dec!(0)), "£0.00");
    assert_eq!(format_amount(dec!(45)), "£45.00");
    assert_eq!(format_amount(dec!(-1200.5)), "-£1,200.50");
    assert_eq!(format_amount(dec!(1234567.891)), "£1,234,567.89");
    assert_eq!(format_amount(dec!(-0.001)), "£0.00");
}

#[test]
fn test_parse_day_arg() {
    assert_eq!(
        commands::parse_day_arg("17/04/2023", "--date").unwrap(),
        "2023-04-17".parse::<Day>().unwrap()
    );
    let err = commands::parse_day_arg("April 17", "--date").unwrap_err();
    assert!(err.to_string().contains("--date"));
}

// ========== Session Tests ==========

#[test]
fn test_load_activity_is_cached_and_categorised() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_statement(&dir);
    let session = setup_session();

    let activity = session.load_activity(&path).unwrap();
    let transactions = activity.transactions();
    assert_eq!(transactions.total_for(&[PayeeCategory::Salaries]), dec!(-1200.00));
    assert_eq!(transactions.total_for(&[PayeeCategory::Vat]), dec!(-500.00));
    assert_eq!(session.cache.keys().unwrap().len(), 1);

    // Served from the cache once the file is gone
    std::fs::remove_file(&path).ok();
    assert!(session.load_activity(&path).is_err());
    std::fs::write(&path, STATEMENT).unwrap();
    assert_eq!(session.load_activity(&path).unwrap(), activity);
}

#[test]
fn test_statement_key_depends_on_accounts() {
    let session = setup_session();
    let mut config = Config::default();
    config.accounts.pop();
    let other = Session::new(config, Cache::in_memory().unwrap(), false).unwrap();

    assert_eq!(session.statement_key(b"x"), session.statement_key(b"x"));
    assert_ne!(session.statement_key(b"x"), session.statement_key(b"y"));
    assert_ne!(session.statement_key(b"x"), other.statement_key(b"x"));
}

#[test]
fn test_unknown_account_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_statement(&dir);
    let mut config = Config::default();
    config.accounts.retain(|a| a.id != "40123456");
    let session = Session::new(config, Cache::in_memory().unwrap(), false).unwrap();

    assert!(session.load_activity(&path).is_err());
    assert!(session.cache.keys().unwrap().is_empty());
}

#[test]
fn test_open_session_with_explicit_paths() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("tally.toml");
    std::fs::write(&config_path, "[[accounts]]\nid = \"40123456\"\nname = \"Current\"\n").unwrap();
    let cache_path = dir.path().join("cache").join("tally.db");

    let session = commands::open_session(Some(&config_path), Some(&cache_path), true).unwrap();
    assert_eq!(session.config.account_ids(), vec!["40123456"]);
    assert!(session.force);
    assert!(cache_path.exists());
}

#[test]
fn test_overrides_reach_period_totals() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_statement(&dir);
    let overrides = dir.path().join("overrides.csv");
    std::fs::write(
        &overrides,
        "account,date,ftid,payee,amount,category\n\
         40123456,2023-04-20,T004,CORNER SHOP LTD,-9.99,BAR_SNACKS\n\
         40123456,2023-04-02,T002,STRIPE PAYOUT,45.00,DONATIONS\n",
    )
    .unwrap();
    let session = setup_session();
    let april = AccountingMonth::new(2023, 8).unwrap();

    let guessed = session.load_transactions(&path, None).unwrap();
    let before = PeriodSummary::for_range("before", &april, &guessed);
    assert_eq!(before.uncategorised, dec!(-9.99));
    assert_eq!(before.total_for(PayeeCategory::BarSnacks), dec!(0));

    let edited = session.load_transactions(&path, Some(&overrides)).unwrap();
    let after = PeriodSummary::for_range("after", &april, &edited);
    assert_eq!(after.uncategorised, dec!(0));
    assert_eq!(after.total_for(PayeeCategory::BarSnacks), dec!(-9.99));
    assert_eq!(after.total, before.total);

    assert_eq!(edited.total_for(&[PayeeCategory::Memberships]), dec!(0));
    assert_eq!(edited.total_for(&[PayeeCategory::Donations]), dec!(45.00));
    let vat = VatSummary::for_range(&april, &edited);
    assert_eq!(vat.uncategorised, dec!(0));
    assert_eq!(vat.vatable_expenditure, dec!(-9.99));
}

#[test]
fn test_statement_without_balances_reports() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("statement.csv");
    std::fs::write(
        &path,
        "account,date,ftid,type,payee,amount,balance\n\
         40123456,2023-04-17,T003,DD,HMRC VAT 123456,-500.00,\n\
         40123456,2023-04-20,T004,DEB,CORNER SHOP LTD,-9.99,\n",
    )
    .unwrap();
    let session = setup_session();

    assert!(commands::cmd_report(&session, &path, None, 2023, Some(8), false, false).is_ok());
    assert!(commands::cmd_classify(&session, &path, None, None, false).is_ok());
    assert!(commands::cmd_balance(&session, &path, "2023-04-18", None).is_err());
}

// ========== Argument Tests ==========

#[test]
fn test_year_bounds() {
    let parsed = Cli::try_parse_from(["tally", "calendar", "--year", "2023"]).unwrap();
    assert!(matches!(parsed.command, Commands::Calendar { year: 2023, .. }));

    assert!(Cli::try_parse_from(["tally", "calendar", "--year", "300000"]).is_err());
    assert!(Cli::try_parse_from(["tally", "calendar", "--year", "0"]).is_err());
    assert!(Cli::try_parse_from(["tally", "report", "--file", "s.csv", "--year", "-5"]).is_err());
}

#[test]
fn test_overrides_flag_on_reports() {
    let parsed = Cli::try_parse_from([
        "tally", "vat", "--file", "s.csv", "--overrides", "o.csv", "--from", "2023-04-01", "--to",
        "2023-04-30",
    ])
    .unwrap();
    match parsed.command {
        Commands::Vat { overrides, .. } => assert_eq!(overrides, Some(PathBuf::from("o.csv"))),
        _ => panic!("expected vat"),
    }
}

// ========== Command Tests ==========

#[test]
fn test_cmd_classify_exports_sheet() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_statement(&dir);
    let export = dir.path().join("categories.csv");
    let session = setup_session();

    commands::cmd_classify(&session, &path, None, Some(&export), false).unwrap();

    let sheet = std::fs::read_to_string(&export).unwrap();
    assert!(sheet.contains("PAULINE LE DIVENAC SALARY,-1200.00,SALARIES"));
    assert!(sheet.contains("CORNER SHOP LTD,-9.99,"));
    assert!(!sheet.contains("UNCATEGORISED"));
}

#[test]
fn test_cmd_classify_with_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_statement(&dir);
    let overrides = dir.path().join("overrides.csv");
    let export = dir.path().join("categories.csv");
    std::fs::write(
        &overrides,
        "account,date,payee,amount,category\n40123456,2023-04-20,CORNER SHOP LTD,-9.99,bar snacks\n",
    )
    .unwrap();
    let session = setup_session();

    commands::cmd_classify(&session, &path, Some(&overrides), Some(&export), true).unwrap();

    let sheet = std::fs::read_to_string(&export).unwrap();
    assert!(sheet.contains("CORNER SHOP LTD,-9.99,BAR_SNACKS"));
}

#[test]
fn test_cmd_classify_bad_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_statement(&dir);
    let overrides = dir.path().join("overrides.csv");
    std::fs::write(
        &overrides,
        "account,date,payee,amount,category\n40123456,2023-04-20,CORNER SHOP LTD,-9.99,CRISPS\n",
    )
    .unwrap();
    let session = setup_session();

    assert!(commands::cmd_classify(&session, &path, Some(&overrides), None, false).is_err());
}

#[test]
fn test_cmd_report() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_statement(&dir);
    let session = setup_session();

    assert!(commands::cmd_report(&session, &path, None, 2023, None, false, false).is_ok());
    assert!(commands::cmd_report(&session, &path, None, 2023, Some(8), true, false).is_ok());
    assert!(commands::cmd_report(&session, &path, None, 2023, Some(8), false, true).is_ok());
    assert!(commands::cmd_report(&session, &path, None, 2023, Some(13), false, false).is_err());
}

#[test]
fn test_cmd_vat() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_statement(&dir);
    let session = setup_session();

    assert!(commands::cmd_vat(&session, &path, None, "2023-04-01", "30/04/2023", false).is_ok());
    assert!(commands::cmd_vat(&session, &path, None, "2023-04-01", "2023-04-30", true).is_ok());
    assert!(commands::cmd_vat(&session, &path, None, "2023-04-30", "2023-04-01", false).is_err());
}

#[test]
fn test_cmd_balance() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_statement(&dir);
    let session = setup_session();

    assert!(commands::cmd_balance(&session, &path, "2023-04-18", None).is_ok());
    assert!(commands::cmd_balance(&session, &path, "2023-04-18", Some("40123456")).is_ok());
    assert!(commands::cmd_balance(&session, &path, "2023-04-18", Some("70991234")).is_err());
    assert!(commands::cmd_balance(&session, &path, "yesterday", None).is_err());
}

#[test]
fn test_cmd_calendar() {
    assert!(commands::cmd_calendar(2023, false).is_ok());
    assert!(commands::cmd_calendar(2023, true).is_ok());
    assert!(commands::cmd_calendar(2030, false).is_ok());
}

#[test]
fn test_cmd_cache_list_and_clear() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_statement(&dir);
    let session = setup_session();

    assert!(commands::cmd_cache_list(&session).is_ok());
    session.load_activity(&path).unwrap();
    assert!(commands::cmd_cache_list(&session).is_ok());

    commands::cmd_cache_clear(&session).unwrap();
    assert!(session.cache.keys().unwrap().is_empty());
}
