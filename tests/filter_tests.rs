mod common;

use budget_horizon::filter::{
    apply_date_range_filter, apply_filters, DateRangeSelector, TransactionFilter, TransactionKind,
    TransactionRecord,
};
use budget_horizon::HorizonError;
use chrono::Duration;
use common::{at, days_between, expense, income, ymd};
use uuid::Uuid;

fn ledger() -> Vec<TransactionRecord> {
    let groceries = Uuid::new_v4();
    let checking = Uuid::new_v4();
    let mut market = expense("2024-05-02", "Farmers market", 42.5);
    market.category_id = Some(groceries);
    market.account_id = Some(checking);
    let mut rent = expense("2024-05-01", "Rent", 1500.0);
    rent.account_id = Some(checking);
    rent.notes = Some("May apartment".into());
    vec![
        income("2024-04-30", "Salary", 4200.0),
        market,
        rent,
        expense("2024-05-02", "Coffee", 3.2).with_tag("Treats"),
        expense("2024-04-15", "Bookshop", 28.0),
        income("2023-12-24", "Gift", 100.0),
    ]
}

fn dates(records: &[TransactionRecord]) -> Vec<&str> {
    records.iter().map(|record| record.date.as_str()).collect()
}

#[test]
fn all_keeps_membership_and_sorts_descending() {
    let records = ledger();
    let now = at(ymd(2024, 5, 2), 9, 0);
    let sorted = apply_date_range_filter(&records, DateRangeSelector::All, now).unwrap();

    assert_eq!(sorted.len(), records.len());
    for record in &records {
        assert!(sorted.contains(record));
    }
    assert_eq!(
        dates(&sorted),
        vec!["2024-05-02", "2024-05-02", "2024-05-01", "2024-04-30", "2024-04-15", "2023-12-24"]
    );
    // Equal dates keep their input order.
    assert_eq!(sorted[0].description, "Farmers market");
    assert_eq!(sorted[1].description, "Coffee");
}

#[test]
fn today_is_subset_of_current_month() {
    let records: Vec<_> = days_between(ymd(2024, 1, 1), ymd(2024, 3, 31))
        .into_iter()
        .map(|day| expense(&day.format("%Y-%m-%d").to_string(), "daily", 1.0))
        .collect();

    for day in days_between(ymd(2024, 1, 1), ymd(2024, 3, 31)) {
        let now = at(day, 23, 59);
        let today = apply_date_range_filter(&records, DateRangeSelector::Today, now).unwrap();
        let month =
            apply_date_range_filter(&records, DateRangeSelector::CurrentMonth, now).unwrap();
        assert!(!today.is_empty());
        assert!(today.iter().all(|record| month.contains(record)), "{day}");
    }
}

#[test]
fn rolling_windows_start_at_midnight() {
    let records = ledger();
    let now = at(ymd(2024, 5, 2), 18, 45);

    let week = apply_date_range_filter(&records, DateRangeSelector::Last7Days, now).unwrap();
    assert_eq!(week.len(), 4);

    let month = apply_date_range_filter(&records, DateRangeSelector::Last30Days, now).unwrap();
    assert_eq!(dates(&month).last(), Some(&"2024-04-15"));

    let this_week = apply_date_range_filter(&records, DateRangeSelector::ThisWeek, now).unwrap();
    // 2024-05-02 is a Thursday; the week opened on Sunday 2024-04-28.
    assert_eq!(this_week.len(), 4);
}

#[test]
fn last_month_excludes_current_month() {
    let records = ledger();
    let now = at(ymd(2024, 5, 2), 9, 0);
    let last = apply_date_range_filter(&records, DateRangeSelector::LastMonth, now).unwrap();
    assert_eq!(dates(&last), vec!["2024-04-30", "2024-04-15"]);

    let year = apply_date_range_filter(&records, DateRangeSelector::CurrentYear, now).unwrap();
    assert_eq!(year.len(), 5);
}

#[test]
fn january_last_month_is_previous_december() {
    let records = ledger();
    let now = at(ymd(2024, 1, 10), 9, 0);
    let last = apply_date_range_filter(&records, DateRangeSelector::LastMonth, now).unwrap();
    assert_eq!(dates(&last), vec!["2023-12-24"]);
}

#[test]
fn empty_input_yields_empty_output() {
    let now = at(ymd(2024, 5, 2), 9, 0);
    for selector in DateRangeSelector::ALL {
        let none: Vec<TransactionRecord> = Vec::new();
        assert!(apply_date_range_filter(&none, selector, now).unwrap().is_empty());
    }
}

#[test]
fn malformed_date_is_reported() {
    let records = vec![expense("2024-13-01", "Broken", 1.0)];
    let now = at(ymd(2024, 5, 2), 9, 0);
    let err = apply_date_range_filter(&records, DateRangeSelector::CurrentYear, now).unwrap_err();
    assert!(matches!(err, HorizonError::InvalidDate(raw) if raw == "2024-13-01"));
}

#[test]
fn search_matches_description_notes_and_tags() {
    let records = ledger();
    let now = at(ymd(2024, 5, 2), 9, 0);
    let search = |needle: &str| {
        let filter = TransactionFilter::new().with_search(needle);
        apply_filters(&records, &filter, now).unwrap()
    };

    assert_eq!(search("MARKET")[0].description, "Farmers market");
    assert_eq!(search("apartment")[0].description, "Rent");
    assert_eq!(search("treat")[0].description, "Coffee");
    assert!(search("nothing like this").is_empty());
}

#[test]
fn attribute_filters_combine_with_and() {
    let records = ledger();
    let now = at(ymd(2024, 5, 2), 9, 0);
    let checking = records[1].account_id.unwrap().to_string();
    let groceries = records[1].category_id.unwrap().to_string();

    let by_account = TransactionFilter::new().with_account(&checking).unwrap();
    assert_eq!(apply_filters(&records, &by_account, now).unwrap().len(), 2);

    let narrowed = by_account.clone().with_category(&groceries).unwrap();
    let result = apply_filters(&records, &narrowed, now).unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].description, "Farmers market");

    let expenses = TransactionFilter::new()
        .with_kind("expense")
        .unwrap()
        .with_amount_range(Some(28.0), Some(1500.0))
        .with_date_range(DateRangeSelector::CurrentMonth);
    let result = apply_filters(&records, &expenses, now).unwrap();
    assert_eq!(
        result.iter().map(|r| r.description.as_str()).collect::<Vec<_>>(),
        vec!["Farmers market", "Rent"]
    );
    assert!(result.iter().all(|r| r.kind == TransactionKind::Expense));
}

#[test]
fn card_filter_skips_records_without_card() {
    let mut records = ledger();
    let card = Uuid::new_v4();
    records[3].card_id = Some(card);
    let now = at(ymd(2024, 5, 2), 9, 0);

    let filter = TransactionFilter::new().with_card(&card.to_string()).unwrap();
    let result = apply_filters(&records, &filter, now).unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].description, "Coffee");

    let unfiltered = TransactionFilter::new().with_card("all").unwrap();
    assert_eq!(apply_filters(&records, &unfiltered, now).unwrap().len(), records.len());
}

#[test]
fn records_deserialize_from_store_rows() {
    let row = r#"{
        "id": "6f1f1c1e-8c44-4a39-9e8b-0b7b7f0d2a11",
        "date": "2024-05-02",
        "description": "Coffee",
        "amount": 3.2,
        "type": "expense",
        "tags": [{ "id": "2b0d4d7e-3f0a-4a62-a8a5-6e8f3c6b6f10", "name": "Treats" }]
    }"#;
    let record: TransactionRecord = serde_json::from_str(row).unwrap();
    assert_eq!(record.kind, TransactionKind::Expense);
    assert_eq!(record.tags[0].name, "Treats");
    assert!(record.card_id.is_none());

    let now = at(ymd(2024, 5, 2), 0, 0) + Duration::minutes(1);
    let today = apply_date_range_filter(&[record], DateRangeSelector::Today, now).unwrap();
    assert_eq!(today.len(), 1);
}
