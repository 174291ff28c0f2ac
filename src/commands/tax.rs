// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::journal::{self, SettleParams};
use crate::utils::{fmt_amount, maybe_print_json, parse_date, parse_decimal, pretty_table};
use crate::{period, reports, store};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("position", sub)) => position(conn, sub),
        Some(("settle", sub)) => settle(conn, sub),
        Some(("report", sub)) => report(conn, sub),
        Some(("list", sub)) => list(conn, sub),
        _ => Ok(()),
    }
}

fn position(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let position = reports::tax_position(conn)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &position)? {
        return Ok(());
    }
    let data = vec![vec![
        fmt_amount(position.output_balance),
        fmt_amount(position.input_balance),
        fmt_amount(position.net),
        position.status.clone(),
    ]];
    println!(
        "{}",
        pretty_table(&["Output tax", "Input tax", "Net", "Status"], data)
    );
    Ok(())
}

fn settle(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let period = period::load(conn)?;
    let (posted, settlement) = journal::settle_tax(
        conn,
        &period,
        SettleParams {
            date: super::date_or_today(sub)?,
            amount: parse_decimal(sub.get_one::<String>("amount").unwrap())?,
            method: super::parse_method(sub),
            reference: sub.get_one::<String>("reference").cloned(),
            notes: sub.get_one::<String>("notes").cloned(),
        },
    )?;
    println!(
        "Settled {} ({}) via {}",
        fmt_amount(settlement.amount),
        settlement.direction,
        posted.reference
    );
    Ok(())
}

fn report(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let from = parse_date(sub.get_one::<String>("from").unwrap())?;
    let to = parse_date(sub.get_one::<String>("to").unwrap())?;
    let report = reports::tax_report(conn, from, to)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        return Ok(());
    }
    let data = vec![vec![
        format!("{} .. {}", report.from, report.to),
        fmt_amount(report.output_tax),
        fmt_amount(report.input_tax),
        fmt_amount(report.net),
    ]];
    println!(
        "{}",
        pretty_table(&["Window", "Output tax", "Input tax", "Net"], data)
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let settlements = store::all_settlements(conn)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &settlements)? {
        return Ok(());
    }
    let data = settlements
        .into_iter()
        .map(|s| {
            vec![
                s.date.to_string(),
                fmt_amount(s.amount),
                s.direction,
                s.method.as_str().to_string(),
                s.reference,
                s.notes.unwrap_or_default(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Date", "Amount", "Direction", "Method", "Reference", "Notes"],
            data
        )
    );
    Ok(())
}
