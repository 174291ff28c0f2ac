// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::reports;
use crate::utils::{fmt_amount, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection) -> Result<()> {
    let mut rows = Vec::new();

    // 1) Cached balances that disagree with a journal replay
    for d in reports::reconcile_accounts(conn)? {
        rows.push(vec![
            "balance_drift".into(),
            format!(
                "{} '{}': cached {} replayed {}",
                d.code,
                d.name,
                fmt_amount(d.cached),
                fmt_amount(d.replayed)
            ),
        ]);
    }

    // 2) Trial balance closure over the whole journal
    let tb = reports::trial_balance(conn, None)?;
    if !tb.is_balanced {
        rows.push(vec![
            "trial_balance_open".into(),
            format!(
                "closing debit {} vs credit {}",
                fmt_amount(tb.totals.closing_debit),
                fmt_amount(tb.totals.closing_credit)
            ),
        ]);
    }

    // 3) Journal lines pointing at codes missing from the chart
    let mut stmt = conn.prepare(
        "SELECT DISTINCT account_code FROM entries
         EXCEPT SELECT code FROM accounts",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let code: String = r.get(0)?;
        rows.push(vec!["orphan_entry_account".into(), code]);
    }

    // 4) Transactions with no lines at all
    let mut stmt2 = conn.prepare(
        "SELECT t.id, t.reference FROM transactions t
         LEFT JOIN entries e ON e.transaction_id = t.id
         WHERE e.id IS NULL",
    )?;
    let mut cur2 = stmt2.query([])?;
    while let Some(r) = cur2.next()? {
        let id: i64 = r.get(0)?;
        let reference: String = r.get(1)?;
        rows.push(vec!["empty_transaction".into(), format!("{} ({})", id, reference)]);
    }

    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
