//! Integration tests for tally-core
//!
//! These tests exercise the full import → classify → override → report workflow.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tally_core::{
    cache::cache_key,
    import::{load_bank_activity, parse_overrides_csv, write_categorised_csv},
    reports::accounting_year_report,
    AccountingMonth, AccountingYear, BankActivity, Cache, Config, DateRange, Day, PayeeCategory,
    PayeeClassifier, SimpleDateRange, Transaction, Transactions, VatSummary, Week,
};

fn day(s: &str) -> Day {
    s.parse().expect("valid day")
}

/// A month of current and savings account activity for FY2023 month 8 (April 2023)
fn statement_csv() -> &'static str {
    "account,date,ftid,type,payee,amount,balance
40123456,2023-04-01,T001,FPO,PAULINE LE DIVENAC SALARY,-1200.00,8800.00
40123456,2023-04-02,T002,BGC,STRIPE PAYOUT,45.00,8845.00
40123456,03/04/2023,T003,BGC,MUSHROOM STRIPE SETTLEMENT,\"1,250.00\",
40123456,03/04/2023,T004,DEB,TESCO STORES 2041,-23.45,10071.55
40123456,2023-04-10,T005,DD,HCD LTD,-3000.00,
40123456,2023-04-10,T006,DD,HCD LTD SERVICE CHARGE,-420.00,6651.55
40123456,2023-04-17,T007,DD,HMRC VAT 123456,-500.00,6151.55
40123456,2023-04-18,T008,FPO,70991234 INTERNET TRANSFER,-1000.00,5151.55
40123456,2023-04-20,T009,DEB,CORNER SHOP LTD,-9.99,5141.56
70991234,2023-04-18,S001,FPI,40123456 INTERNET TRANSFER,1000.00,21000.00
70991234,2023-04-30,S002,INT,GROSS INTEREST,2.10,21002.10
"
}

fn write_statement(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let path = dir.path().join("statement.csv");
    std::fs::write(&path, statement_csv()).expect("write statement");
    path
}

fn load(dir: &tempfile::TempDir) -> BankActivity {
    let config = Config::default();
    load_bank_activity(&write_statement(dir), &config.accounts).expect("load statement")
}

#[test]
fn test_full_classification_workflow() {
    let dir = tempfile::tempdir().unwrap();
    let activity = load(&dir).categorised(&PayeeClassifier::default());
    let transactions = activity.transactions();

    assert_eq!(transactions.len(), 11);
    assert_eq!(transactions.total_for(&[PayeeCategory::Salaries]), dec!(-1200.00));
    assert_eq!(transactions.total_for(&[PayeeCategory::Memberships]), dec!(45.00));
    assert_eq!(transactions.total_for(&[PayeeCategory::TicketSales]), dec!(1250.00));
    assert_eq!(transactions.total_for(&[PayeeCategory::Rent]), dec!(-3000.00));
    assert_eq!(transactions.total_for(&[PayeeCategory::ServiceCharge]), dec!(-420.00));
    assert_eq!(transactions.total_for(&[PayeeCategory::Vat]), dec!(-500.00));
    assert_eq!(transactions.total_for(&[PayeeCategory::BankInterest]), dec!(2.10));
    assert_eq!(transactions.uncategorised_total(), dec!(-9.99));

    // Both legs of the transfer net to zero
    assert_eq!(
        transactions.total_for(&[PayeeCategory::InternalTransfer]),
        Decimal::ZERO
    );
    assert_eq!(transactions.restrict_to_category(PayeeCategory::InternalTransfer).len(), 2);
}

#[test]
fn test_overrides_round_trip_through_sheet() {
    let dir = tempfile::tempdir().unwrap();
    let activity = load(&dir).categorised(&PayeeClassifier::default());

    let mut sheet = Vec::new();
    write_categorised_csv(&mut sheet, &activity.transactions()).unwrap();
    let edited = String::from_utf8(sheet)
        .unwrap()
        .replace("CORNER SHOP LTD,-9.99,", "CORNER SHOP LTD,-9.99,BAR_SNACKS");

    let overrides = parse_overrides_csv(edited.as_bytes()).unwrap();
    let overridden = activity.with_overrides(&overrides).transactions();

    assert_eq!(overridden.uncategorised_total(), Decimal::ZERO);
    assert_eq!(
        overridden.total_for(&[PayeeCategory::BarSnacks]),
        dec!(-23.45) + dec!(-9.99)
    );
    // Every other category is unchanged
    assert_eq!(overridden.total_for(&[PayeeCategory::Rent]), dec!(-3000.00));
}

#[test]
fn test_balances_from_statement() {
    let dir = tempfile::tempdir().unwrap();
    let activity = load(&dir);

    let current = activity.statement("40123456").unwrap();
    assert_eq!(current.balance_at_eod(day("2023-03-31")), Some(dec!(10000.00)));
    assert_eq!(current.balance_at_eod(day("2023-04-03")), Some(dec!(10071.55)));
    assert_eq!(current.balance_at_eod(day("2023-04-25")), Some(dec!(5141.56)));

    assert_eq!(
        activity.balance_at_eod(day("2023-04-30")).unwrap(),
        dec!(5141.56) + dec!(21002.10)
    );
    assert_eq!(
        activity.balance_at_sod(day("2023-04-18")).unwrap(),
        dec!(6151.55) + dec!(20000.00)
    );
}

#[test]
fn test_accounting_month_report() {
    let dir = tempfile::tempdir().unwrap();
    let transactions = load(&dir).categorised(&PayeeClassifier::default()).transactions();

    let report = accounting_year_report(&transactions, AccountingYear::new(2023));
    assert_eq!(report.len(), 12);

    // FY2023 month 8 starts on Monday 3 April, so the 1st and 2nd fall in month 7
    let march = &report[6];
    let april = &report[7];
    assert_eq!(april.first_day, day("2023-04-03"));
    assert_eq!(march.total_for(PayeeCategory::Salaries), dec!(-1200.00));
    assert_eq!(march.total_for(PayeeCategory::Memberships), dec!(45.00));
    assert_eq!(april.total_for(PayeeCategory::Salaries), Decimal::ZERO);
    assert_eq!(april.uncategorised, dec!(-9.99));
    assert_eq!(march.total + april.total, transactions.total_amount());
}

#[test]
fn test_vat_summary_over_range() {
    let dir = tempfile::tempdir().unwrap();
    let transactions = load(&dir).categorised(&PayeeClassifier::default()).transactions();

    let range = SimpleDateRange::new(day("2023-04-01"), day("2023-04-30")).unwrap();
    let vat = VatSummary::for_range(&range, &transactions);
    assert_eq!(vat.vatable_income, dec!(1250.00));
    assert_eq!(vat.exempt_income, dec!(45.00) + dec!(2.10));
    assert_eq!(vat.vat_settled, dec!(-500.00));
    assert_eq!(vat.uncategorised, dec!(-9.99));
}

#[test]
fn test_cached_load_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_statement(&dir);
    let cache = Cache::open(&dir.path().join("cache.db")).unwrap();
    let key = cache_key("bank_activity", statement_csv().as_bytes());
    let accounts = Config::default().accounts;

    let first: BankActivity = cache
        .get_or_compute(&key, false, || load_bank_activity(&path, &accounts))
        .unwrap();
    assert!(cache.has(&key).unwrap());

    // A hit never touches the file
    std::fs::remove_file(&path).unwrap();
    let second: BankActivity = cache
        .get_or_compute(&key, false, || load_bank_activity(&path, &accounts))
        .unwrap();
    assert_eq!(first, second);

    // Forcing a refresh does
    assert!(cache
        .get_or_compute(&key, true, || load_bank_activity(&path, &accounts))
        .is_err());
}

#[test]
fn test_merge_of_reimported_statement_fails() {
    let dir = tempfile::tempdir().unwrap();
    let once = load(&dir).transactions();
    let twice = load(&dir).transactions();
    assert!(once.merge(&twice).is_err());

    let other = Transactions::new(vec![Transaction::new(
        "40123456",
        day("2023-05-02"),
        "HCD LTD",
        dec!(-3000.00),
    )]);
    let merged = once.merge(&other).unwrap();
    assert_eq!(merged.total_amount(), once.total_amount() + dec!(-3000.00));
}

#[test]
fn test_fiscal_calendar_properties() {
    for year in 2013..=2026 {
        let fy = AccountingYear::new(year);
        assert_eq!(fy.last_day() + 1, fy.succ().first_day());
        assert_eq!(fy.first_day(), AccountingMonth::new(year, 1).unwrap().first_day());
        assert!(matches!(fy.num_weeks(), 52 | 53));

        let last = fy.num_weeks();
        assert!(Week::new(fy, 0).is_err());
        assert!(Week::new(fy, last + 1).is_err());
        let week = Week::new(fy, last).unwrap();
        assert_eq!(week.first_day(), fy.first_day() + 7 * (last as i64 - 1));
        assert_eq!(week.last_day(), fy.last_day());
    }

    let mut d = day("2015-01-01");
    while d <= day("2025-12-31") {
        let month = AccountingMonth::containing(d);
        assert!(month.contains_day(d), "{} not in {}", d, month);
        assert_eq!(AccountingYear::containing(d).unwrap(), month.year());
        d = d + 1;
    }
}
