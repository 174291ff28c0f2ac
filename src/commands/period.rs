// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::period::{self, Period};
use crate::utils::{maybe_print_json, parse_date, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => {
            let period = period::load(conn)?;
            if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &period)? {
                return Ok(());
            }
            let data = vec![vec![
                period.period_name.clone(),
                period.start_date.to_string(),
                period.end_date.to_string(),
                if period.is_locked { "locked" } else { "open" }.into(),
                period.allow_past_transactions.to_string(),
                period.allow_future_transactions.to_string(),
            ]];
            println!(
                "{}",
                pretty_table(
                    &["Name", "Start", "End", "State", "Past ok", "Future ok"],
                    data
                )
            );
        }
        Some(("set", sub)) => {
            let start = parse_date(sub.get_one::<String>("start").unwrap())?;
            let end = parse_date(sub.get_one::<String>("end").unwrap())?;
            let name = sub
                .get_one::<String>("name")
                .cloned()
                .unwrap_or_else(|| format!("Period {} to {}", start, end));
            let period = Period {
                start_date: start,
                end_date: end,
                period_name: name,
                is_locked: false,
                allow_past_transactions: !sub.get_flag("forbid-past"),
                allow_future_transactions: sub.get_flag("allow-future"),
            };
            period::save(conn, &period)?;
            println!("Period set: {} ({} to {})", period.period_name, start, end);
        }
        Some(("lock", _)) => {
            let mut period = period::load(conn)?;
            period.is_locked = true;
            period::save(conn, &period)?;
            println!("Period locked; postings will be rejected.");
        }
        Some(("unlock", _)) => {
            let mut period = period::load(conn)?;
            period.is_locked = false;
            period::save(conn, &period)?;
            println!("Period unlocked.");
        }
        _ => {}
    }
    Ok(())
}
