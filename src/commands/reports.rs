// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::reports;
use crate::utils::{fmt_amount, fmt_amount_or_blank, maybe_print_json, parse_date, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("ledger", sub)) => ledger(conn, sub),
        Some(("trial-balance", sub)) => trial_balance(conn, sub),
        Some(("groups", sub)) => groups(conn, sub),
        _ => Ok(()),
    }
}

fn ledger(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let code = sub.get_one::<String>("code").unwrap();
    let from = sub.get_one::<String>("from").map(|s| parse_date(s)).transpose()?;
    let to = sub.get_one::<String>("to").map(|s| parse_date(s)).transpose()?;
    let report = reports::general_ledger(conn, code, from, to)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        return Ok(());
    }
    println!(
        "Ledger {} '{}' (opening {})",
        report.account_code,
        report.account_name,
        fmt_amount(report.opening_balance)
    );
    let data = report
        .rows
        .iter()
        .map(|r| {
            vec![
                r.date.to_string(),
                r.reference.clone(),
                r.description.clone(),
                fmt_amount_or_blank(r.debit),
                fmt_amount_or_blank(r.credit),
                fmt_amount(r.balance),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Date", "Reference", "Description", "Debit", "Credit", "Balance"],
            data
        )
    );
    println!(
        "Totals: debit {} credit {} closing {}",
        fmt_amount(report.total_debit),
        fmt_amount(report.total_credit),
        fmt_amount(report.closing_balance)
    );
    Ok(())
}

fn trial_balance(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let as_of = sub
        .get_one::<String>("as-of")
        .map(|s| parse_date(s))
        .transpose()?;
    let tb = reports::trial_balance(conn, as_of)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &tb)? {
        return Ok(());
    }
    let mut data: Vec<Vec<String>> = tb
        .rows
        .iter()
        .map(|r| {
            vec![
                r.code.clone(),
                r.name.clone(),
                fmt_amount_or_blank(r.opening_debit),
                fmt_amount_or_blank(r.opening_credit),
                fmt_amount_or_blank(r.movement_debit),
                fmt_amount_or_blank(r.movement_credit),
                fmt_amount_or_blank(r.closing_debit),
                fmt_amount_or_blank(r.closing_credit),
            ]
        })
        .collect();
    data.push(vec![
        String::new(),
        "TOTAL".into(),
        fmt_amount(tb.totals.opening_debit),
        fmt_amount(tb.totals.opening_credit),
        fmt_amount(tb.totals.movement_debit),
        fmt_amount(tb.totals.movement_credit),
        fmt_amount(tb.totals.closing_debit),
        fmt_amount(tb.totals.closing_credit),
    ]);
    println!(
        "{}",
        pretty_table(
            &[
                "Code", "Account", "Open Dr", "Open Cr", "Move Dr", "Move Cr", "Close Dr",
                "Close Cr",
            ],
            data
        )
    );
    if tb.is_balanced {
        println!("Trial balance closes.");
    } else {
        println!(
            "OUT OF BALANCE by {}",
            fmt_amount(tb.totals.closing_debit - tb.totals.closing_credit)
        );
    }
    Ok(())
}

fn groups(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let as_of = sub
        .get_one::<String>("as-of")
        .map(|s| parse_date(s))
        .transpose()?;
    let report = reports::account_groups(conn, as_of)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        return Ok(());
    }
    let mut data = Vec::new();
    for section in &report.sections {
        for account in &section.accounts {
            data.push(vec![
                section.kind.to_string(),
                account.code.clone(),
                account.name.clone(),
                fmt_amount(account.balance),
            ]);
        }
        data.push(vec![
            section.kind.to_string(),
            String::new(),
            "TOTAL".into(),
            fmt_amount(section.total),
        ]);
    }
    println!("{}", pretty_table(&["Class", "Code", "Account", "Balance"], data));
    println!("Net profit: {}", fmt_amount(report.net_profit));
    Ok(())
}
