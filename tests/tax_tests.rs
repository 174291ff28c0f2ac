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
use tillbook::journal::{self, PurchaseParams, SaleParams, SettleParams};
use tillbook::models::PayMethod;
use tillbook::period::Period;
use tillbook::{db, reports, store};

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

fn cash_sale(conn: &mut Connection, subtotal: &str, rate: &str) {
    let draft = journal::pos_sale(SaleParams {
        date: d("2025-06-01"),
        reference: None,
        description: None,
        subtotal: dec(subtotal),
        discount: Decimal::ZERO,
        tax_rate: dec(rate),
        cogs: Decimal::ZERO,
        method: PayMethod::Cash,
    })
    .unwrap();
    journal::post(conn, &period(), draft).unwrap();
}

#[test]
fn taxed_cash_sale_builds_three_lines() {
    let mut conn = setup();
    cash_sale(&mut conn, "100", "15");

    let txns = store::all_transactions(&conn).unwrap();
    assert_eq!(txns.len(), 1);
    let lines = &txns[0].lines;
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0].account_code, codes::CASH);
    assert_eq!(lines[0].debit, dec("115.00"));
    assert_eq!(lines[1].account_code, codes::SALES);
    assert_eq!(lines[1].credit, dec("100"));
    assert_eq!(lines[2].account_code, codes::OUTPUT_TAX);
    assert_eq!(lines[2].credit, dec("15.00"));
    assert!(txns[0].reference.starts_with("INV-"));
}

#[test]
fn position_nets_output_against_input() {
    let mut conn = setup();
    cash_sale(&mut conn, "100", "15");
    let purchase = journal::purchase(PurchaseParams {
        date: d("2025-06-02"),
        reference: None,
        description: None,
        subtotal: dec("40"),
        discount: Decimal::ZERO,
        tax_rate: dec("15"),
        method: PayMethod::Credit,
    })
    .unwrap();
    journal::post(&mut conn, &period(), purchase).unwrap();

    let position = reports::tax_position(&conn).unwrap();
    assert_eq!(position.output_balance, dec("15.00"));
    assert_eq!(position.input_balance, dec("6.00"));
    assert_eq!(position.net, dec("9.00"));
    assert_eq!(position.status, "payable");
}

#[test]
fn settlement_beyond_net_position_rejected() {
    let mut conn = setup();
    cash_sale(&mut conn, "400", "10"); // output tax 40
    let err = journal::settle_tax(
        &mut conn,
        &period(),
        SettleParams {
            date: d("2025-06-30"),
            amount: dec("50"),
            method: PayMethod::Cash,
            reference: None,
            notes: None,
        },
    )
    .unwrap_err();
    match err {
        LedgerError::AmountExceedsNetTax { amount, net } => {
            assert_eq!(amount, dec("50"));
            assert_eq!(net, dec("40.00"));
        }
        other => panic!("expected AmountExceedsNetTax, got {:?}", other),
    }
    // no settlement recorded, balances untouched
    assert!(store::all_settlements(&conn).unwrap().is_empty());
    assert_eq!(balance(&conn, codes::OUTPUT_TAX), dec("-40.00"));
}

#[test]
fn exact_settlement_zeroes_the_position() {
    let mut conn = setup();
    cash_sale(&mut conn, "400", "10");
    let (posted, settlement) = journal::settle_tax(
        &mut conn,
        &period(),
        SettleParams {
            date: d("2025-06-30"),
            amount: dec("40"),
            method: PayMethod::Cash,
            reference: None,
            notes: Some("Q2".into()),
        },
    )
    .unwrap();

    assert_eq!(settlement.direction, "payment");
    assert_eq!(settlement.transaction_id, posted.id);
    assert!(posted.reference.starts_with("TAX-"));

    let position = reports::tax_position(&conn).unwrap();
    assert_eq!(position.net, Decimal::ZERO);
    assert_eq!(position.status, "settled");
    // cash: 440 in from the sale, 40 out to the authority
    assert_eq!(balance(&conn, codes::CASH), dec("400.00"));
    assert_eq!(store::all_settlements(&conn).unwrap().len(), 1);
}

#[test]
fn refund_direction_when_input_exceeds_output() {
    let mut conn = setup();
    let purchase = journal::purchase(PurchaseParams {
        date: d("2025-06-02"),
        reference: None,
        description: None,
        subtotal: dec("200"),
        discount: Decimal::ZERO,
        tax_rate: dec("15"),
        method: PayMethod::Credit,
    })
    .unwrap();
    journal::post(&mut conn, &period(), purchase).unwrap();

    let position = reports::tax_position(&conn).unwrap();
    assert_eq!(position.net, dec("-30.00"));
    assert_eq!(position.status, "receivable");

    let (_, settlement) = journal::settle_tax(
        &mut conn,
        &period(),
        SettleParams {
            date: d("2025-06-30"),
            amount: dec("30"),
            method: PayMethod::Bank,
            reference: None,
            notes: None,
        },
    )
    .unwrap();
    assert_eq!(settlement.direction, "refund");
    assert_eq!(balance(&conn, codes::INPUT_TAX), Decimal::ZERO);
    assert_eq!(balance(&conn, codes::BANK), dec("30"));
}

#[test]
fn window_report_sums_tax_activity() {
    let mut conn = setup();
    cash_sale(&mut conn, "100", "15");
    let purchase = journal::purchase(PurchaseParams {
        date: d("2025-06-02"),
        reference: None,
        description: None,
        subtotal: dec("40"),
        discount: Decimal::ZERO,
        tax_rate: dec("15"),
        method: PayMethod::Credit,
    })
    .unwrap();
    journal::post(&mut conn, &period(), purchase).unwrap();

    let report = reports::tax_report(&conn, d("2025-06-01"), d("2025-06-30")).unwrap();
    assert_eq!(report.output_tax, dec("15.00"));
    assert_eq!(report.input_tax, dec("6.00"));
    assert_eq!(report.net, dec("9.00"));

    // a window missing the purchase sees only the sale
    let report = reports::tax_report(&conn, d("2025-06-01"), d("2025-06-01")).unwrap();
    assert_eq!(report.input_tax, Decimal::ZERO);
    assert_eq!(report.net, dec("15.00"));
}
