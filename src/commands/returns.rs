// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::journal::{self, ReturnParams};
use crate::models::TxnKind;
use crate::utils::{fmt_amount, maybe_print_json, parse_decimal, pretty_table};
use crate::{period, store};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("sales", sub)) => record(conn, sub, TxnKind::SalesReturn),
        Some(("purchase", sub)) => record(conn, sub, TxnKind::PurchaseReturn),
        Some(("list", sub)) => list(conn, sub),
        _ => Ok(()),
    }
}

fn record(conn: &mut Connection, sub: &clap::ArgMatches, kind: TxnKind) -> Result<()> {
    let params = ReturnParams {
        date: super::date_or_today(sub)?,
        amount: parse_decimal(sub.get_one::<String>("amount").unwrap())?,
        tax_rate: parse_decimal(sub.get_one::<String>("tax-rate").unwrap())?,
        method: super::parse_method(sub),
        counterparty: sub.get_one::<String>("counterparty").unwrap().clone(),
        reason: sub.get_one::<String>("reason").cloned(),
    };

    let period = period::load(conn)?;
    let (posted, _) = journal::post_return(conn, &period, &params, kind)?;
    println!(
        "Recorded {} {} for {}",
        kind,
        posted.reference,
        fmt_amount(params.amount)
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let returns = store::all_returns(conn)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &returns)? {
        return Ok(());
    }
    let data = returns
        .into_iter()
        .map(|r| {
            vec![
                r.date.to_string(),
                r.kind.to_string(),
                r.counterparty,
                fmt_amount(r.amount),
                r.reason.unwrap_or_default(),
                r.transaction_id.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Date", "Kind", "Counterparty", "Amount", "Reason", "Txn"],
            data
        )
    );
    Ok(())
}
