// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use tillbook::chart::{self, codes};
use tillbook::errors::LedgerError;
use tillbook::journal::{self, ReturnParams};
use tillbook::models::{PayMethod, TxnKind};
use tillbook::period::Period;
use tillbook::{db, store};

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

fn balance(conn: &Connection, code: &str) -> Decimal {
    store::get_account(conn, code).unwrap().unwrap().balance
}

#[test]
fn receipt_is_two_balanced_lines() {
    let mut conn = setup();
    let draft =
        journal::quick_receipt(d("2025-06-01"), dec("1000"), PayMethod::Cash, None, None).unwrap();
    let posted = journal::post(&mut conn, &period(), draft).unwrap();

    assert_eq!(posted.lines.len(), 2);
    assert_eq!(posted.total_debit(), posted.total_credit());
    assert!(posted.reference.starts_with("REC-"));
    assert_eq!(balance(&conn, codes::CASH), dec("1000"));
    assert_eq!(balance(&conn, codes::SALES), dec("-1000"));
}

#[test]
fn payment_hits_expense_and_till() {
    let mut conn = setup();
    let draft =
        journal::quick_payment(d("2025-06-01"), dec("80"), PayMethod::Bank, None, None).unwrap();
    journal::post(&mut conn, &period(), draft).unwrap();
    assert_eq!(balance(&conn, codes::GENERAL_EXPENSES), dec("80"));
    assert_eq!(balance(&conn, codes::BANK), dec("-80"));
}

#[test]
fn transfer_moves_till_to_bank_by_default() {
    let mut conn = setup();
    let draft = journal::quick_transfer(d("2025-06-01"), dec("300"), None, None, None).unwrap();
    journal::post(&mut conn, &period(), draft).unwrap();
    assert_eq!(balance(&conn, codes::CASH), dec("-300"));
    assert_eq!(balance(&conn, codes::BANK), dec("300"));
}

#[test]
fn collection_reduces_receivable() {
    let mut conn = setup();
    // a credit sale first so the receivable carries a balance
    let sale = journal::pos_sale(journal::SaleParams {
        date: d("2025-06-01"),
        reference: None,
        description: None,
        subtotal: dec("200"),
        discount: Decimal::ZERO,
        tax_rate: Decimal::ZERO,
        cogs: Decimal::ZERO,
        method: PayMethod::Credit,
    })
    .unwrap();
    journal::post(&mut conn, &period(), sale).unwrap();
    assert_eq!(balance(&conn, codes::RECEIVABLE), dec("200"));

    let draft =
        journal::customer_collection(d("2025-06-05"), dec("200"), PayMethod::Bank, "ACME", None)
            .unwrap();
    journal::post(&mut conn, &period(), draft).unwrap();
    assert_eq!(balance(&conn, codes::RECEIVABLE), Decimal::ZERO);
    assert_eq!(balance(&conn, codes::BANK), dec("200"));
}

#[test]
fn supplier_payment_reduces_payable() {
    let mut conn = setup();
    let purchase = journal::purchase(journal::PurchaseParams {
        date: d("2025-06-01"),
        reference: None,
        description: None,
        subtotal: dec("150"),
        discount: Decimal::ZERO,
        tax_rate: Decimal::ZERO,
        method: PayMethod::Credit,
    })
    .unwrap();
    journal::post(&mut conn, &period(), purchase).unwrap();
    assert_eq!(balance(&conn, codes::PAYABLE), dec("-150"));

    let draft =
        journal::supplier_payment(d("2025-06-10"), dec("150"), PayMethod::Cash, "Depot", None)
            .unwrap();
    journal::post(&mut conn, &period(), draft).unwrap();
    assert_eq!(balance(&conn, codes::PAYABLE), Decimal::ZERO);
    assert_eq!(balance(&conn, codes::CASH), dec("-150"));
}

#[test]
fn non_positive_amounts_rejected_by_builders() {
    let err =
        journal::quick_receipt(d("2025-06-01"), Decimal::ZERO, PayMethod::Cash, None, None)
            .unwrap_err();
    assert!(matches!(err, LedgerError::NonPositiveAmount));
    let err = journal::quick_payment(d("2025-06-01"), dec("-5"), PayMethod::Cash, None, None)
        .unwrap_err();
    assert!(matches!(err, LedgerError::NonPositiveAmount));
}

#[test]
fn sales_return_balances_and_writes_record() {
    let mut conn = setup();
    let params = ReturnParams {
        date: d("2025-06-20"),
        amount: dec("100"),
        tax_rate: dec("15"),
        method: PayMethod::Cash,
        counterparty: "ACME".into(),
        reason: Some("Damaged".into()),
    };
    let (posted, record_id) =
        journal::post_return(&mut conn, &period(), &params, TxnKind::SalesReturn).unwrap();

    assert_eq!(posted.total_debit(), posted.total_credit());
    assert_eq!(posted.total_debit(), dec("115.00"));
    assert_eq!(balance(&conn, codes::SALES), dec("100"));
    assert_eq!(balance(&conn, codes::OUTPUT_TAX), dec("15.00"));
    assert_eq!(balance(&conn, codes::CASH), dec("-115.00"));

    let records = store::all_returns(&conn).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, record_id);
    assert_eq!(records[0].kind, TxnKind::SalesReturn);
    assert_eq!(records[0].transaction_id, posted.id);
}

#[test]
fn purchase_return_balances_and_writes_record() {
    let mut conn = setup();
    let params = ReturnParams {
        date: d("2025-06-20"),
        amount: dec("60"),
        tax_rate: dec("10"),
        method: PayMethod::Credit,
        counterparty: "Depot".into(),
        reason: None,
    };
    let (posted, _) =
        journal::post_return(&mut conn, &period(), &params, TxnKind::PurchaseReturn).unwrap();

    assert_eq!(posted.total_debit(), posted.total_credit());
    assert_eq!(balance(&conn, codes::PAYABLE), dec("66.00"));
    assert_eq!(balance(&conn, codes::INVENTORY), dec("-60"));
    assert_eq!(balance(&conn, codes::INPUT_TAX), dec("-6.00"));
}
