// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store;
use anyhow::Result;
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("journal", sub)) => export_journal(conn, sub),
        _ => Ok(()),
    }
}

/// One output row per journal line, header fields repeated, so the file
/// loads straight into a spreadsheet.
fn export_journal(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();

    let txns = store::all_transactions(conn)?;
    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "date",
                "reference",
                "kind",
                "account",
                "debit",
                "credit",
                "description",
            ])?;
            for t in &txns {
                for l in &t.lines {
                    wtr.write_record([
                        t.date.to_string(),
                        t.reference.clone(),
                        t.kind.to_string(),
                        l.account_code.clone(),
                        l.debit.to_string(),
                        l.credit.to_string(),
                        l.description.clone().unwrap_or_default(),
                    ])?;
                }
            }
            wtr.flush()?;
        }
        "json" => {
            let mut items = Vec::new();
            for t in &txns {
                for l in &t.lines {
                    items.push(json!({
                        "date": t.date.to_string(),
                        "reference": t.reference,
                        "kind": t.kind.as_str(),
                        "account": l.account_code,
                        "debit": l.debit.to_string(),
                        "credit": l.credit.to_string(),
                        "description": l.description,
                    }));
                }
            }
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        _ => {
            eprintln!("Unknown format: {} (use csv|json)", fmt);
        }
    }
    println!("Exported journal to {}", out);
    Ok(())
}
