// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::chart::{self, AccountSpec};
use crate::models::AccountType;
use crate::utils::{fmt_amount, maybe_print_json, parse_decimal, pretty_table};
use anyhow::{Result, bail};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let code = sub.get_one::<String>("code").unwrap().clone();
            let name = sub.get_one::<String>("name").unwrap().clone();
            let typ = sub.get_one::<String>("type").unwrap();
            let Some(kind) = AccountType::parse(typ) else {
                bail!("Unknown account type '{}'", typ);
            };
            let opening = parse_decimal(sub.get_one::<String>("opening").unwrap())?;
            let account = chart::create_account(
                conn,
                AccountSpec {
                    code,
                    name,
                    kind,
                    parent: sub.get_one::<String>("parent").cloned(),
                    description: sub.get_one::<String>("description").cloned(),
                    opening_balance: opening,
                },
            )?;
            println!(
                "Added account {} '{}' ({}, opening {})",
                account.code,
                account.name,
                account.kind,
                fmt_amount(account.opening_balance)
            );
        }
        Some(("list", sub)) => {
            let kind = sub
                .get_one::<String>("type")
                .and_then(|s| AccountType::parse(s));
            let accounts = chart::list_accounts(conn, kind)?;
            if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &accounts)? {
                return Ok(());
            }
            let data = accounts
                .into_iter()
                .map(|a| {
                    vec![
                        a.code,
                        a.name,
                        a.kind.to_string(),
                        a.parent.unwrap_or_default(),
                        fmt_amount(a.balance),
                    ]
                })
                .collect();
            println!(
                "{}",
                pretty_table(&["Code", "Name", "Type", "Parent", "Balance"], data)
            );
        }
        Some(("show", sub)) => {
            let code = sub.get_one::<String>("code").unwrap();
            let account = chart::get_account(conn, code)?;
            if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &account)? {
                return Ok(());
            }
            let data = vec![vec![
                account.code,
                account.name,
                account.kind.to_string(),
                account.parent.unwrap_or_default(),
                fmt_amount(account.opening_balance),
                fmt_amount(account.balance),
            ]];
            println!(
                "{}",
                pretty_table(
                    &["Code", "Name", "Type", "Parent", "Opening", "Balance"],
                    data
                )
            );
        }
        Some(("rm", sub)) => {
            let code = sub.get_one::<String>("code").unwrap();
            chart::delete_account(conn, code)?;
            println!("Removed account {}", code);
        }
        _ => {}
    }
    Ok(())
}
