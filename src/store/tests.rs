#![allow(clippy::unwrap_used)]

use super::*;
use crate::aggregate;
use crate::models::Period;
use rust_decimal_macros::dec;
use tempfile::TempDir;

fn setup() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.json");
    (dir, path)
}

fn ts(s: &str) -> NaiveDateTime {
    s.parse().unwrap()
}

// ── Loading ───────────────────────────────────────────────────

#[test]
fn test_missing_file_is_empty_store() {
    let (_dir, path) = setup();
    let store = Store::open(&path).unwrap();
    assert!(store.transactions().is_empty());
    assert!(store.list_categories().is_empty());
    assert!(!path.exists());
}

#[test]
fn test_corrupt_file_is_read_error() {
    let (_dir, path) = setup();
    fs::write(&path, "{ not json").unwrap();
    let err = Store::open(&path).unwrap_err();
    assert!(matches!(
        err,
        StoreError::StorageRead {
            source: ReadFailure::Json(_),
            ..
        }
    ));
    // The bad file is left alone
    assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");
}

#[test]
fn test_directory_in_place_of_file_is_read_error() {
    let (_dir, path) = setup();
    fs::create_dir(&path).unwrap();
    let err = Store::open(&path).unwrap_err();
    assert!(matches!(
        err,
        StoreError::StorageRead {
            source: ReadFailure::Io(_),
            ..
        }
    ));
}

#[test]
fn test_empty_object_loads_as_empty() {
    let (_dir, path) = setup();
    fs::write(&path, "{}").unwrap();
    let store = Store::open(&path).unwrap();
    assert!(store.transactions().is_empty());
}

#[test]
fn test_load_existing_file_format() {
    let (_dir, path) = setup();
    fs::write(
        &path,
        r#"{
    "transacoes": [
        {"data": "2024-01-15T10:30:00.123456", "valor": 30.0, "categoria": "Food",
         "descricao": "Lunch", "recorrente": false},
        {"data": "2024-01-16T09:00:00", "valor": 20, "categoria": "Transport",
         "descricao": "Bus"},
        {"data": "2024-01-17T19:45:00", "valor": 12.5, "categoria": "Food",
         "descricao": "", "recorrente": true}
    ],
    "categorias": ["Transport", "Food"]
}"#,
    )
    .unwrap();

    let store = Store::open(&path).unwrap();
    assert_eq!(store.transactions().len(), 3);
    assert_eq!(store.transactions()[1].amount, dec!(20));
    assert!(!store.transactions()[1].recurring);
    assert!(store.transactions()[2].recurring);
    // Categories are re-derived in first-seen order
    assert_eq!(store.list_categories(), ["Food", "Transport"]);
}

// ── Adding ────────────────────────────────────────────────────

#[test]
fn test_add_single_transaction() {
    let (_dir, path) = setup();
    let mut store = Store::open(&path).unwrap();
    let txn = store.add_transaction("50.00", "Food", "Lunch", false).unwrap();

    assert_eq!(txn.amount, dec!(50.00));
    assert_eq!(txn.category, "Food");
    assert_eq!(txn.description, "Lunch");
    assert!(!txn.recurring);

    assert_eq!(aggregate::total_spend(store.transactions()), dec!(50.00));
    let by_cat = aggregate::spend_by_category(store.transactions());
    assert_eq!(by_cat.len(), 1);
    assert_eq!(by_cat["Food"], dec!(50.00));
    assert_eq!(store.list_categories(), ["Food"]);
}

#[test]
fn test_add_two_categories() {
    let (_dir, path) = setup();
    let mut store = Store::open(&path).unwrap();
    store.add_transaction("30.00", "Food", "", false).unwrap();
    store.add_transaction("20.00", "Transport", "", false).unwrap();

    assert_eq!(aggregate::total_spend(store.transactions()), dec!(50.00));
    let by_cat = aggregate::spend_by_category(store.transactions());
    assert_eq!(by_cat.len(), 2);
    assert_eq!(by_cat["Food"], dec!(30.00));
    assert_eq!(by_cat["Transport"], dec!(20.00));
}

#[test]
fn test_list_preserves_call_order() {
    let (_dir, path) = setup();
    let mut store = Store::open(&path).unwrap();
    let inputs = [
        ("10", "Food", "a"),
        ("5.5", "Rent", "b"),
        ("7", "Food", "c"),
        ("0", "Gifts", "d"),
    ];
    let created: Vec<Transaction> = inputs
        .iter()
        .map(|(amt, cat, desc)| store.add_transaction(amt, cat, desc, false).unwrap())
        .collect();

    let listed: Vec<Transaction> = store
        .list_transactions(&TransactionFilter::default())
        .into_iter()
        .cloned()
        .collect();
    assert_eq!(listed, created);
    let descriptions: Vec<&str> = listed.iter().map(|t| t.description.as_str()).collect();
    assert_eq!(descriptions, ["a", "b", "c", "d"]);
}

#[test]
fn test_categories_are_unique_in_first_seen_order() {
    let (_dir, path) = setup();
    let mut store = Store::open(&path).unwrap();
    for cat in ["Food", "Rent", "Food", "Food", "Fun", "Rent"] {
        store.add_transaction("1", cat, "", false).unwrap();
    }
    assert_eq!(store.list_categories(), ["Food", "Rent", "Fun"]);
}

#[test]
fn test_category_case_is_kept_distinct() {
    let (_dir, path) = setup();
    let mut store = Store::open(&path).unwrap();
    store.add_transaction("1", "Food", "", false).unwrap();
    store.add_transaction("1", "food", "", false).unwrap();
    assert_eq!(store.list_categories(), ["Food", "food"]);
}

#[test]
fn test_add_trims_input() {
    let (_dir, path) = setup();
    let mut store = Store::open(&path).unwrap();
    let txn = store
        .add_transaction("  12.30 ", "  Coffee ", " espresso ", true)
        .unwrap();
    assert_eq!(txn.amount, dec!(12.30));
    assert_eq!(txn.category, "Coffee");
    assert_eq!(txn.description, "espresso");
    assert!(txn.recurring);
}

// ── Validation ────────────────────────────────────────────────

#[test]
fn test_empty_category_is_rejected_without_change() {
    let (_dir, path) = setup();
    let mut store = Store::open(&path).unwrap();
    store.add_transaction("10", "Food", "", false).unwrap();
    let before = fs::read_to_string(&path).unwrap();

    let err = store.add_transaction("10", "   ", "", false).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(ValidationError::MissingField("category"))
    ));
    assert_eq!(store.transactions().len(), 1);
    assert_eq!(fs::read_to_string(&path).unwrap(), before);
}

#[test]
fn test_non_numeric_amount_is_rejected_without_change() {
    let (_dir, path) = setup();
    let mut store = Store::open(&path).unwrap();
    store.add_transaction("10", "Food", "", false).unwrap();

    let err = store.add_transaction("ten", "Food", "", false).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(ValidationError::InvalidAmount(ref s)) if s == "ten"
    ));
    assert!(err.is_validation());
    assert_eq!(store.transactions().len(), 1);
    assert_eq!(store.list_categories(), ["Food"]);
}

#[test]
fn test_missing_amount_is_rejected() {
    let (_dir, path) = setup();
    let mut store = Store::open(&path).unwrap();
    let err = store.add_transaction("", "Food", "", false).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(ValidationError::MissingField("amount"))
    ));
    assert!(store.transactions().is_empty());
    // Nothing was ever written
    assert!(!path.exists());
}

#[test]
fn test_negative_amount_is_rejected() {
    let (_dir, path) = setup();
    let mut store = Store::open(&path).unwrap();
    let err = store.add_transaction("-5", "Food", "", false).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(ValidationError::NegativeAmount)
    ));
    assert!(store.transactions().is_empty());
}

#[test]
fn test_insert_validates() {
    let (_dir, path) = setup();
    let mut store = Store::open(&path).unwrap();
    let negative = Transaction::at(
        ts("2024-01-01T00:00:00"),
        dec!(-1),
        "Food".into(),
        String::new(),
        false,
    );
    assert!(store.insert(negative).unwrap_err().is_validation());
    let blank = Transaction::at(
        ts("2024-01-01T00:00:00"),
        dec!(1),
        " ".into(),
        String::new(),
        false,
    );
    assert!(store.insert(blank).unwrap_err().is_validation());
    assert!(store.transactions().is_empty());
}

// ── parse_amount ──────────────────────────────────────────────

#[test]
fn test_parse_amount_forms() {
    assert_eq!(parse_amount("42").unwrap(), dec!(42));
    assert_eq!(parse_amount("42.5").unwrap(), dec!(42.5));
    assert_eq!(parse_amount("12,50").unwrap(), dec!(12.50));
    assert_eq!(parse_amount(" 0 ").unwrap(), dec!(0));
}

#[test]
fn test_parse_amount_rejects() {
    assert_eq!(
        parse_amount("1,234,5"),
        Err(ValidationError::InvalidAmount("1,234,5".into()))
    );
    assert_eq!(
        parse_amount("abc"),
        Err(ValidationError::InvalidAmount("abc".into()))
    );
    assert_eq!(parse_amount("   "), Err(ValidationError::MissingField("amount")));
    assert_eq!(parse_amount("-0.01"), Err(ValidationError::NegativeAmount));
}

#[test]
fn test_parse_amount_bounds() {
    assert_eq!(MAX_AMOUNT, dec!(1000000000000));
    assert_eq!(
        parse_amount("999999999999.99").unwrap(),
        dec!(999999999999.99)
    );
    assert_eq!(
        parse_amount("1000000000000"),
        Err(ValidationError::AmountTooLarge("1000000000000".into()))
    );
    assert!(matches!(
        parse_amount("79228162514264337593543950335"),
        Err(ValidationError::AmountTooLarge(_))
    ));
}

#[test]
fn test_parse_amount_precision() {
    // Trailing zeros are not extra precision
    assert_eq!(parse_amount("12.500").unwrap(), dec!(12.5));
    assert_eq!(
        parse_amount("1.001"),
        Err(ValidationError::TooManyDecimals {
            value: "1.001".into(),
            max: MAX_DECIMALS,
        })
    );
    assert!(matches!(
        parse_amount("1.00000000000000001"),
        Err(ValidationError::TooManyDecimals { .. })
    ));
}

#[test]
fn test_out_of_range_amounts_leave_store_unchanged() {
    let (_dir, path) = setup();
    let mut store = Store::open(&path).unwrap();
    for raw in ["1.00000000000000001", "79228162514264337593543950335", "1000000000000"] {
        let err = store.add_transaction(raw, "Food", "", false).unwrap_err();
        assert!(err.is_validation(), "{raw} should be rejected");
    }
    let huge = Transaction::at(
        ts("2024-01-01T00:00:00"),
        dec!(50000000000000000000000000000),
        "Food".into(),
        String::new(),
        false,
    );
    assert!(store.insert(huge).unwrap_err().is_validation());
    assert!(store.transactions().is_empty());
    assert!(!path.exists());
}

// ── Persistence ───────────────────────────────────────────────

#[test]
fn test_round_trip_through_file() {
    let (_dir, path) = setup();
    let mut store = Store::open(&path).unwrap();
    store.add_transaction("30.00", "Food", "Lunch", false).unwrap();
    store.add_transaction("19.99", "Streaming", "", true).unwrap();
    store
        .insert(Transaction::at(
            ts("2023-12-31T23:59:59.500"),
            dec!(0.1),
            "Food".into(),
            "Gum".into(),
            false,
        ))
        .unwrap();

    let reloaded = Store::open(&path).unwrap();
    assert_eq!(reloaded.transactions(), store.transactions());
    assert_eq!(reloaded.list_categories(), store.list_categories());
}

#[test]
fn test_round_trip_at_amount_limits() {
    let (_dir, path) = setup();
    let mut store = Store::open(&path).unwrap();
    for raw in [
        "999999999999.99",
        "123456789012.34",
        "0.01",
        "0.07",
        "8765432.19",
        "0",
    ] {
        store.add_transaction(raw, "Limits", "", false).unwrap();
    }

    let reloaded = Store::open(&path).unwrap();
    assert_eq!(reloaded.transactions(), store.transactions());
    assert_eq!(reloaded.transactions()[0].amount, dec!(999999999999.99));
    assert_eq!(reloaded.transactions()[1].amount, dec!(123456789012.34));
}

#[test]
fn test_totals_of_largest_amounts_do_not_overflow() {
    let (_dir, path) = setup();
    let mut store = Store::open(&path).unwrap();
    for _ in 0..3 {
        store
            .add_transaction("999999999999.99", "A", "", false)
            .unwrap();
    }
    let total = aggregate::total_spend(store.transactions());
    assert_eq!(total, dec!(2999999999999.97));
}

#[test]
fn test_file_uses_fixed_field_names() {
    let (_dir, path) = setup();
    let mut store = Store::open(&path).unwrap();
    store.add_transaction("30", "Food", "Lunch", true).unwrap();

    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let first = &value["transacoes"][0];
    assert_eq!(first["valor"], 30.0);
    assert_eq!(first["categoria"], "Food");
    assert_eq!(first["descricao"], "Lunch");
    assert_eq!(first["recorrente"], true);
    assert!(first["data"].is_string());
    assert_eq!(value["categorias"], serde_json::json!(["Food"]));
}

#[test]
fn test_no_temp_file_left_behind() {
    let (dir, path) = setup();
    let mut store = Store::open(&path).unwrap();
    store.add_transaction("1", "Food", "", false).unwrap();
    let names: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, ["data.json"]);
}

#[test]
fn test_failed_write_rolls_back() {
    let dir = tempfile::tempdir().unwrap();
    let data_dir = dir.path().join("pocketbook");
    fs::create_dir(&data_dir).unwrap();
    let path = data_dir.join("data.json");

    let mut store = Store::open(&path).unwrap();
    let first = store.add_transaction("30", "Food", "", false).unwrap();

    // Pull the directory out from under the store so the next write fails
    fs::remove_dir_all(&data_dir).unwrap();

    let err = store.add_transaction("20", "Transport", "", false).unwrap_err();
    assert!(matches!(err, StoreError::StorageWrite { .. }));
    assert_eq!(store.transactions(), [first]);
    assert_eq!(store.list_categories(), ["Food"]);
}

#[test]
fn test_failed_write_keeps_existing_category() {
    let dir = tempfile::tempdir().unwrap();
    let data_dir = dir.path().join("pocketbook");
    fs::create_dir(&data_dir).unwrap();
    let path = data_dir.join("data.json");

    let mut store = Store::open(&path).unwrap();
    store.add_transaction("30", "Food", "", false).unwrap();
    fs::remove_dir_all(&data_dir).unwrap();

    assert!(store.add_transaction("5", "Food", "", false).is_err());
    assert_eq!(store.transactions().len(), 1);
    assert_eq!(store.list_categories(), ["Food"]);
}

// ── Filtering ─────────────────────────────────────────────────

fn seeded_store(path: &Path) -> Store {
    let mut store = Store::open(path).unwrap();
    for (when, cat, amt) in [
        ("2024-04-28T10:00:00", "Food", dec!(10)),
        ("2024-05-02T10:00:00", "Rent", dec!(900)),
        ("2024-05-15T10:00:00", "Food", dec!(25)),
        ("2024-05-19T18:00:00", "Fun", dec!(40)),
    ] {
        store
            .insert(Transaction::at(ts(when), amt, cat.into(), String::new(), false))
            .unwrap();
    }
    store
}

#[test]
fn test_filter_by_category() {
    let (_dir, path) = setup();
    let store = seeded_store(&path);
    let filter = TransactionFilter::default().with_category("Food");
    let food = store.list_transactions(&filter);
    assert_eq!(food.len(), 2);
    assert!(food.iter().all(|t| t.category == "Food"));
    assert_eq!(aggregate::total_spend(food), dec!(35));
}

#[test]
fn test_filter_by_period_relative_to_now() {
    let (_dir, path) = setup();
    let store = seeded_store(&path);
    let now = ts("2024-05-20T12:00:00");

    let week = TransactionFilter::default().with_period(Period::Last7Days);
    let amounts: Vec<Decimal> = store
        .list_transactions_at(&week, now)
        .iter()
        .map(|t| t.amount)
        .collect();
    assert_eq!(amounts, [dec!(25), dec!(40)]);

    let month = TransactionFilter::default().with_period(Period::ThisMonth);
    assert_eq!(store.list_transactions_at(&month, now).len(), 3);
}

#[test]
fn test_filter_by_range_and_category() {
    let (_dir, path) = setup();
    let store = seeded_store(&path);
    let filter = TransactionFilter::default()
        .with_category("Food")
        .with_period(Period::parse("2024-04-01..2024-04-30").unwrap());
    let hits = store.list_transactions(&filter);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].amount, dec!(10));
}

#[test]
fn test_filter_unknown_category_is_empty() {
    let (_dir, path) = setup();
    let store = seeded_store(&path);
    let filter = TransactionFilter::default().with_category("Travel");
    assert!(store.list_transactions(&filter).is_empty());
}
