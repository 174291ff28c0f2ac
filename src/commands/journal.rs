// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Draft, JournalLine, Transaction, TxnKind};
use crate::utils::{fmt_amount_or_blank, maybe_print_json, parse_date, parse_decimal, pretty_table};
use crate::{journal, period, store};
use anyhow::{Context, Result, bail};
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("post", sub)) => post(conn, sub),
        Some(("list", sub)) => list(conn, sub),
        Some(("show", sub)) => show(conn, sub),
        _ => Ok(()),
    }
}

/// One `--line` value: CODE:DEBIT:CREDIT with decimal amounts.
fn parse_line(raw: &str) -> Result<JournalLine> {
    let parts: Vec<&str> = raw.split(':').collect();
    let [code, debit, credit] = parts.as_slice() else {
        bail!("Invalid line '{}', expected CODE:DEBIT:CREDIT", raw);
    };
    Ok(JournalLine {
        account_code: code.to_string(),
        debit: parse_decimal(debit).with_context(|| format!("Bad debit in line '{}'", raw))?,
        credit: parse_decimal(credit).with_context(|| format!("Bad credit in line '{}'", raw))?,
        description: None,
    })
}

fn post(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let date = super::date_or_today(sub)?;
    let description = sub.get_one::<String>("description").unwrap().clone();
    let mut draft = Draft::new(date, TxnKind::Manual, description)
        .with_reference(sub.get_one::<String>("reference").cloned());
    for raw in sub.get_many::<String>("line").unwrap() {
        draft = draft.line(parse_line(raw)?);
    }

    let period = period::load(conn)?;
    let posted = journal::post(conn, &period, draft)?;
    println!(
        "Posted {} ({}) with {} lines, total {}",
        posted.reference,
        posted.id,
        posted.lines.len(),
        fmt_amount_or_blank(posted.total_debit())
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let txns = match (
        sub.get_one::<String>("from"),
        sub.get_one::<String>("to"),
    ) {
        (Some(f), Some(t)) => store::transactions_between(conn, parse_date(f)?, parse_date(t)?)?,
        (None, None) => store::all_transactions(conn)?,
        _ => bail!("--from and --to must be given together"),
    };
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &txns)? {
        return Ok(());
    }
    let data = txns
        .iter()
        .map(|t| {
            vec![
                t.id.to_string(),
                t.date.to_string(),
                t.kind.to_string(),
                t.reference.clone(),
                t.description.clone(),
                fmt_amount_or_blank(t.total_debit()),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Id", "Date", "Kind", "Reference", "Description", "Total"],
            data
        )
    );
    Ok(())
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id: i64 = sub
        .get_one::<String>("id")
        .unwrap()
        .parse()
        .context("Invalid transaction id")?;
    let Some(txn) = store::get_transaction(conn, id)? else {
        bail!("No transaction with id {}", id);
    };
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &txn)? {
        return Ok(());
    }
    print_transaction(&txn);
    Ok(())
}

fn print_transaction(txn: &Transaction) {
    println!(
        "{} {} [{}] {}",
        txn.date, txn.reference, txn.kind, txn.description
    );
    let data = txn
        .lines
        .iter()
        .map(|l| {
            vec![
                l.account_code.clone(),
                fmt_amount_or_blank(l.debit),
                fmt_amount_or_blank(l.credit),
                l.description.clone().unwrap_or_default(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Account", "Debit", "Credit", "Description"], data)
    );
}
