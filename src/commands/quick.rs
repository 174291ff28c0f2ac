// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::parse_decimal;
use crate::{journal, period};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    let Some((name, sub)) = m.subcommand() else {
        return Ok(());
    };
    let date = super::date_or_today(sub)?;
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let method = super::parse_method(sub);

    let draft = match name {
        "receipt" => journal::quick_receipt(
            date,
            amount,
            method,
            sub.get_one::<String>("source").map(String::as_str),
            sub.get_one::<String>("description").cloned(),
        )?,
        "payment" => journal::quick_payment(
            date,
            amount,
            method,
            sub.get_one::<String>("expense").map(String::as_str),
            sub.get_one::<String>("description").cloned(),
        )?,
        "transfer" => journal::quick_transfer(
            date,
            amount,
            sub.get_one::<String>("from").map(String::as_str),
            sub.get_one::<String>("to").map(String::as_str),
            sub.get_one::<String>("description").cloned(),
        )?,
        "collect" => journal::customer_collection(
            date,
            amount,
            method,
            sub.get_one::<String>("customer").unwrap(),
            sub.get_one::<String>("reference").cloned(),
        )?,
        "pay" => journal::supplier_payment(
            date,
            amount,
            method,
            sub.get_one::<String>("supplier").unwrap(),
            sub.get_one::<String>("reference").cloned(),
        )?,
        _ => return Ok(()),
    };

    let period = period::load(conn)?;
    let posted = journal::post(conn, &period, draft)?;
    println!("Posted {} ({})", posted.reference, posted.description);
    Ok(())
}
