// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use tillbook::chart::{self, codes};
use tillbook::journal::{self, SaleParams};
use tillbook::models::PayMethod;
use tillbook::period::Period;
use tillbook::{cli, commands, db};

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    chart::seed_default_chart(&conn).unwrap();
    conn
}

fn d(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn seed_activity(conn: &mut Connection) {
    let period = Period::default_for(d("2025-06-15"));
    let sale = journal::pos_sale(SaleParams {
        date: d("2025-06-01"),
        reference: Some("INV-1".into()),
        description: None,
        subtotal: "100".parse().unwrap(),
        discount: Decimal::ZERO,
        tax_rate: "15".parse().unwrap(),
        cogs: Decimal::ZERO,
        method: PayMethod::Cash,
    })
    .unwrap();
    journal::post(conn, &period, sale).unwrap();
}

fn run_export(conn: &Connection, out: &str, format: &str) {
    let matches = cli::build_cli().get_matches_from([
        "tillbook", "export", "journal", "--out", out, "--format", format,
    ]);
    let Some(("export", m)) = matches.subcommand() else {
        panic!("no export subcommand");
    };
    commands::exporter::handle(conn, m).unwrap();
}

#[test]
fn csv_export_one_row_per_line() {
    let mut conn = setup();
    seed_activity(&mut conn);
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("journal.csv");

    run_export(&conn, out.to_str().unwrap(), "csv");

    let body = std::fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = body.lines().collect();
    // header + three journal lines
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("date,reference,kind,account"));
    assert!(lines[1].contains("INV-1"));
    assert!(lines[1].contains(codes::CASH));
    assert!(body.contains(codes::OUTPUT_TAX));
}

#[test]
fn json_export_round_trips() {
    let mut conn = setup();
    seed_activity(&mut conn);
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("journal.json");

    run_export(&conn, out.to_str().unwrap(), "json");

    let body = std::fs::read_to_string(&out).unwrap();
    let items: serde_json::Value = serde_json::from_str(&body).unwrap();
    let arr = items.as_array().unwrap();
    assert_eq!(arr.len(), 3);
    assert_eq!(arr[0]["reference"], "INV-1");
    assert_eq!(arr[0]["account"], codes::CASH);
    assert_eq!(arr[0]["debit"], "115.00");
}
