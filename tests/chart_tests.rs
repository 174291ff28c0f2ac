// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use rust_decimal::Decimal;
use tillbook::chart::{self, AccountSpec, codes};
use tillbook::errors::LedgerError;
use tillbook::models::{AccountType, PayMethod};
use tillbook::period::Period;
use tillbook::{db, journal};

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    chart::seed_default_chart(&conn).unwrap();
    conn
}

fn acct(code: &str, kind: AccountType, parent: Option<&str>) -> AccountSpec {
    AccountSpec {
        code: code.to_string(),
        name: format!("Account {}", code),
        kind,
        parent: parent.map(str::to_string),
        description: None,
        opening_balance: Decimal::ZERO,
    }
}

#[test]
fn seed_is_idempotent() {
    let conn = setup();
    assert_eq!(chart::seed_default_chart(&conn).unwrap(), 0);
    assert_eq!(chart::list_accounts(&conn, None).unwrap().len(), 18);
}

#[test]
fn duplicate_code_rejected() {
    let conn = setup();
    let err = chart::create_account(&conn, acct(codes::CASH, AccountType::Asset, None)).unwrap_err();
    assert!(matches!(err, LedgerError::DuplicateCode(c) if c == codes::CASH));
}

#[test]
fn malformed_code_rejected() {
    let conn = setup();
    for bad in ["1", "10A5", "123456789", "10-1"] {
        let err = chart::create_account(&conn, acct(bad, AccountType::Asset, None)).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidCode(_)), "code {}", bad);
    }
}

#[test]
fn parent_must_exist_and_share_class() {
    let conn = setup();
    let err =
        chart::create_account(&conn, acct("1099", AccountType::Asset, Some("9999"))).unwrap_err();
    assert!(matches!(err, LedgerError::InvalidParent { .. }));

    // 2000 is a liability root; an asset cannot hang off it
    let err =
        chart::create_account(&conn, acct("1098", AccountType::Asset, Some("2000"))).unwrap_err();
    assert!(matches!(err, LedgerError::InvalidParent { .. }));

    chart::create_account(&conn, acct("1097", AccountType::Asset, Some("1000"))).unwrap();
}

#[test]
fn opening_balance_seeds_cached_balance() {
    let conn = setup();
    let mut s = acct("1097", AccountType::Asset, Some("1000"));
    s.opening_balance = "350.75".parse().unwrap();
    let account = chart::create_account(&conn, s).unwrap();
    assert_eq!(account.balance, account.opening_balance);
}

#[test]
fn delete_blocked_once_referenced() {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    chart::seed_default_chart(&conn).unwrap();

    let period = Period::default_for("2025-06-15".parse().unwrap());
    let draft = journal::quick_receipt(
        "2025-06-15".parse().unwrap(),
        "100".parse().unwrap(),
        PayMethod::Cash,
        None,
        None,
    )
    .unwrap();
    journal::post(&mut conn, &period, draft).unwrap();

    let err = chart::delete_account(&conn, codes::CASH).unwrap_err();
    assert!(matches!(err, LedgerError::HasTransactions(c) if c == codes::CASH));
    // still present
    chart::get_account(&conn, codes::CASH).unwrap();
}

#[test]
fn delete_ok_when_unreferenced() {
    let conn = setup();
    chart::create_account(&conn, acct("1097", AccountType::Asset, Some("1000"))).unwrap();
    chart::delete_account(&conn, "1097").unwrap();
    let err = chart::get_account(&conn, "1097").unwrap_err();
    assert!(matches!(err, LedgerError::UnknownAccount(_)));
}
