// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::journal::{self, SaleParams};
use crate::period;
use crate::utils::{fmt_amount, parse_decimal};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let draft = journal::pos_sale(SaleParams {
        date: super::date_or_today(sub)?,
        reference: sub.get_one::<String>("reference").cloned(),
        description: sub.get_one::<String>("description").cloned(),
        subtotal: parse_decimal(sub.get_one::<String>("subtotal").unwrap())?,
        discount: parse_decimal(sub.get_one::<String>("discount").unwrap())?,
        tax_rate: parse_decimal(sub.get_one::<String>("tax-rate").unwrap())?,
        cogs: parse_decimal(sub.get_one::<String>("cogs").unwrap())?,
        method: super::parse_method(sub),
    })?;

    let period = period::load(conn)?;
    let posted = journal::post(conn, &period, draft)?;
    println!(
        "Recorded sale {} for {}",
        posted.reference,
        fmt_amount(posted.total_debit())
    );
    Ok(())
}
