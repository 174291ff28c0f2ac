// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use tillbook::chart::{self, AccountSpec, codes};
use tillbook::journal::{self, PurchaseParams, SaleParams};
use tillbook::models::{AccountType, PayMethod};
use tillbook::period::Period;
use tillbook::{db, reports};

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    chart::seed_default_chart(&conn).unwrap();
    conn
}

fn d(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn period() -> Period {
    Period::default_for(d("2025-06-15"))
}

/// A day of activity touching most of the chart.
fn busy_day(conn: &mut Connection) {
    let p = period();
    let sale = journal::pos_sale(SaleParams {
        date: d("2025-06-01"),
        reference: None,
        description: None,
        subtotal: dec("500"),
        discount: dec("20"),
        tax_rate: dec("15"),
        cogs: dec("180"),
        method: PayMethod::Cash,
    })
    .unwrap();
    journal::post(conn, &p, sale).unwrap();

    let purchase = journal::purchase(PurchaseParams {
        date: d("2025-06-02"),
        reference: None,
        description: None,
        subtotal: dec("300"),
        discount: Decimal::ZERO,
        tax_rate: dec("15"),
        method: PayMethod::Credit,
    })
    .unwrap();
    journal::post(conn, &p, purchase).unwrap();

    let rent = journal::quick_payment(d("2025-06-03"), dec("120"), PayMethod::Bank, None, None)
        .unwrap();
    journal::post(conn, &p, rent).unwrap();
}

#[test]
fn cached_balances_match_full_replay() {
    let mut conn = setup();
    busy_day(&mut conn);
    let drift = reports::reconcile_accounts(&conn).unwrap();
    assert!(drift.is_empty(), "unexpected drift: {:?}", drift);
    assert!(reports::reconcile_account(&conn, codes::CASH).unwrap().is_none());
}

#[test]
fn trial_balance_closes_after_activity() {
    let mut conn = setup();
    busy_day(&mut conn);
    let tb = reports::trial_balance(&conn, None).unwrap();
    assert!(tb.is_balanced);
    assert_eq!(tb.totals.movement_debit, tb.totals.movement_credit);
    assert_eq!(tb.totals.closing_debit, tb.totals.closing_credit);
    // untouched seed accounts are omitted
    assert!(tb.rows.iter().all(|r| r.code != "3010"));
}

#[test]
fn trial_balance_splits_by_sign() {
    let mut conn = setup();
    busy_day(&mut conn);
    let tb = reports::trial_balance(&conn, None).unwrap();
    let sales = tb.rows.iter().find(|r| r.code == codes::SALES).unwrap();
    assert_eq!(sales.closing_debit, Decimal::ZERO);
    assert_eq!(sales.closing_credit, dec("500"));
    assert_eq!(sales.movement_credit, dec("500"));
    let cash = tb.rows.iter().find(|r| r.code == codes::CASH).unwrap();
    assert!(cash.closing_debit > Decimal::ZERO);
    assert_eq!(cash.closing_credit, Decimal::ZERO);
}

#[test]
fn opening_balance_lands_in_opening_columns() {
    let conn = setup();
    chart::create_account(
        &conn,
        AccountSpec {
            code: "1015".into(),
            name: "Petty cash".into(),
            kind: AccountType::Asset,
            parent: Some("1000".into()),
            description: None,
            opening_balance: dec("50"),
        },
    )
    .unwrap();
    let tb = reports::trial_balance(&conn, None).unwrap();
    let petty = tb.rows.iter().find(|r| r.code == "1015").unwrap();
    assert_eq!(petty.opening_debit, dec("50"));
    assert_eq!(petty.movement_debit, Decimal::ZERO);
    assert_eq!(petty.closing_debit, dec("50"));
    // opening on one side only is flagged, not silently absorbed
    assert!(!tb.is_balanced);
}

#[test]
fn forced_imbalance_is_flagged() {
    let mut conn = setup();
    busy_day(&mut conn);
    // write a one-sided entry behind the engine's back
    conn.execute(
        "INSERT INTO transactions(date, type, reference, description)
         VALUES ('2025-06-04', 'manual', 'JE-BAD', 'tampered')",
        [],
    )
    .unwrap();
    let id = conn.last_insert_rowid();
    conn.execute(
        "INSERT INTO entries(transaction_id, account_code, debit, credit)
         VALUES (?1, ?2, '77', '0')",
        params![id, codes::CASH],
    )
    .unwrap();

    let tb = reports::trial_balance(&conn, None).unwrap();
    assert!(!tb.is_balanced);
    assert_eq!(tb.totals.closing_debit - tb.totals.closing_credit, dec("77"));
    // and the cached balance no longer matches the replay
    let drift = reports::reconcile_accounts(&conn).unwrap();
    assert_eq!(drift.len(), 1);
    assert_eq!(drift[0].code, codes::CASH);
    assert_eq!(drift[0].difference, dec("-77"));
}

#[test]
fn general_ledger_replays_running_balance() {
    let mut conn = setup();
    chart::create_account(
        &conn,
        AccountSpec {
            code: "1015".into(),
            name: "Petty cash".into(),
            kind: AccountType::Asset,
            parent: Some("1000".into()),
            description: None,
            opening_balance: dec("50"),
        },
    )
    .unwrap();
    let p = period();
    for (date, amount) in [("2025-06-01", "30"), ("2025-06-03", "20")] {
        let draft = journal::quick_transfer(d(date), dec(amount), Some(codes::CASH), Some("1015"), None)
            .unwrap();
        journal::post(&mut conn, &p, draft).unwrap();
    }
    let draft =
        journal::quick_payment(d("2025-06-05"), dec("15"), PayMethod::Cash, None, None).unwrap();
    journal::post(&mut conn, &p, draft).unwrap();

    let report = reports::general_ledger(&conn, "1015", None, None).unwrap();
    assert_eq!(report.opening_balance, dec("50"));
    assert_eq!(report.rows.len(), 2);
    assert_eq!(report.rows[0].balance, dec("80"));
    assert_eq!(report.rows[1].balance, dec("100"));
    assert_eq!(report.closing_balance, dec("100"));

    // a window folds earlier movement into the opening balance
    let windowed =
        reports::general_ledger(&conn, "1015", Some(d("2025-06-02")), None).unwrap();
    assert_eq!(windowed.opening_balance, dec("80"));
    assert_eq!(windowed.rows.len(), 1);
    assert_eq!(windowed.closing_balance, dec("100"));
}

#[test]
fn group_totals_and_net_profit() {
    let mut conn = setup();
    let p = period();
    let sale = journal::quick_receipt(d("2025-06-01"), dec("100"), PayMethod::Cash, None, None)
        .unwrap();
    journal::post(&mut conn, &p, sale).unwrap();
    let rent =
        journal::quick_payment(d("2025-06-02"), dec("40"), PayMethod::Cash, None, None).unwrap();
    journal::post(&mut conn, &p, rent).unwrap();

    let report = reports::account_groups(&conn, None).unwrap();
    let revenue = report
        .sections
        .iter()
        .find(|s| s.kind == AccountType::Revenue)
        .unwrap();
    assert_eq!(revenue.total, dec("100"));
    let expenses = report
        .sections
        .iter()
        .find(|s| s.kind == AccountType::Expense)
        .unwrap();
    assert_eq!(expenses.total, dec("40"));
    assert_eq!(report.net_profit, dec("60"));
}

#[test]
fn as_of_cutoff_excludes_later_activity() {
    let mut conn = setup();
    busy_day(&mut conn);
    let tb = reports::trial_balance(&conn, Some(d("2025-06-01"))).unwrap();
    assert!(tb.is_balanced);
    // the purchase on 06-02 is not visible yet
    assert!(tb.rows.iter().all(|r| r.code != codes::PAYABLE));
}
