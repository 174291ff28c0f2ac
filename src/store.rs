// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Record access over the SQLite collections. Everything above this layer
//! works with typed `Account`/`Transaction` values; everything below is
//! TEXT columns. Amounts round-trip through strings so no float ever
//! touches a stored balance.

use crate::errors::LedgerError;
use crate::models::{
    Account, AccountType, JournalLine, PayMethod, ReturnRecord, Settlement, Transaction, TxnKind,
};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;

pub fn parse_amount(s: &str) -> Result<Decimal, LedgerError> {
    s.parse::<Decimal>()
        .map_err(|_| LedgerError::CorruptRecord(s.to_string()))
}

fn parse_date(s: &str) -> Result<NaiveDate, LedgerError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| LedgerError::CorruptRecord(s.to_string()))
}

// ---------------------------------------------------------------- accounts

type AccountRow = (String, String, String, Option<String>, Option<String>, String, String);

fn account_from_row(row: AccountRow) -> Result<Account, LedgerError> {
    let (code, name, kind, parent, description, opening, balance) = row;
    let kind = AccountType::parse(&kind).ok_or_else(|| LedgerError::InvalidType(kind.clone()))?;
    Ok(Account {
        code,
        name,
        kind,
        parent,
        description,
        opening_balance: parse_amount(&opening)?,
        balance: parse_amount(&balance)?,
    })
}

pub fn get_account(conn: &Connection, code: &str) -> Result<Option<Account>, LedgerError> {
    let row: Option<AccountRow> = conn
        .query_row(
            "SELECT code, name, type, parent, description, opening_balance, balance
             FROM accounts WHERE code=?1",
            params![code],
            |r| {
                Ok((
                    r.get(0)?,
                    r.get(1)?,
                    r.get(2)?,
                    r.get(3)?,
                    r.get(4)?,
                    r.get(5)?,
                    r.get(6)?,
                ))
            },
        )
        .optional()?;
    row.map(account_from_row).transpose()
}

/// Upsert. Opening balance is written on insert and on update alike; the
/// chart registry is responsible for never changing it after creation.
pub fn save_account(conn: &Connection, account: &Account) -> Result<(), LedgerError> {
    conn.execute(
        "INSERT INTO accounts(code, name, type, parent, description, opening_balance, balance)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
         ON CONFLICT(code) DO UPDATE SET
             name=excluded.name,
             parent=excluded.parent,
             description=excluded.description,
             balance=excluded.balance",
        params![
            account.code,
            account.name,
            account.kind.as_str(),
            account.parent,
            account.description,
            account.opening_balance.to_string(),
            account.balance.to_string()
        ],
    )?;
    Ok(())
}

pub fn delete_account_row(conn: &Connection, code: &str) -> Result<(), LedgerError> {
    conn.execute("DELETE FROM accounts WHERE code=?1", params![code])?;
    Ok(())
}

pub fn all_accounts(conn: &Connection) -> Result<Vec<Account>, LedgerError> {
    let mut stmt = conn.prepare(
        "SELECT code, name, type, parent, description, opening_balance, balance
         FROM accounts ORDER BY code",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get(0)?,
            r.get(1)?,
            r.get(2)?,
            r.get(3)?,
            r.get(4)?,
            r.get(5)?,
            r.get(6)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(account_from_row(row?)?);
    }
    Ok(out)
}

/// The deletion guard's scan: does any posted line reference this code?
pub fn account_has_entries(conn: &Connection, code: &str) -> Result<bool, LedgerError> {
    let hit: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM entries WHERE account_code=?1 LIMIT 1",
            params![code],
            |r| r.get(0),
        )
        .optional()?;
    Ok(hit.is_some())
}

// ------------------------------------------------------------ transactions

pub fn insert_transaction(
    conn: &Connection,
    date: NaiveDate,
    kind: TxnKind,
    reference: &str,
    description: &str,
) -> Result<i64, LedgerError> {
    conn.execute(
        "INSERT INTO transactions(date, type, reference, description) VALUES (?1, ?2, ?3, ?4)",
        params![date.to_string(), kind.as_str(), reference, description],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn insert_line(conn: &Connection, txn_id: i64, line: &JournalLine) -> Result<(), LedgerError> {
    conn.execute(
        "INSERT INTO entries(transaction_id, account_code, debit, credit, description)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            txn_id,
            line.account_code,
            line.debit.to_string(),
            line.credit.to_string(),
            line.description
        ],
    )?;
    Ok(())
}

fn lines_for(conn: &Connection, txn_id: i64) -> Result<Vec<JournalLine>, LedgerError> {
    let mut stmt = conn.prepare(
        "SELECT account_code, debit, credit, description
         FROM entries WHERE transaction_id=?1 ORDER BY id",
    )?;
    let rows = stmt.query_map(params![txn_id], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, Option<String>>(3)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (account_code, debit, credit, description) = row?;
        out.push(JournalLine {
            account_code,
            debit: parse_amount(&debit)?,
            credit: parse_amount(&credit)?,
            description,
        });
    }
    Ok(out)
}

type TxnRow = (i64, String, String, String, String);

fn txn_from_row(conn: &Connection, row: TxnRow) -> Result<Transaction, LedgerError> {
    let (id, date, kind, reference, description) = row;
    let kind = TxnKind::parse(&kind).ok_or_else(|| LedgerError::CorruptRecord(kind.clone()))?;
    Ok(Transaction {
        id,
        date: parse_date(&date)?,
        kind,
        reference,
        description,
        lines: lines_for(conn, id)?,
    })
}

pub fn get_transaction(conn: &Connection, id: i64) -> Result<Option<Transaction>, LedgerError> {
    let row: Option<TxnRow> = conn
        .query_row(
            "SELECT id, date, type, reference, description FROM transactions WHERE id=?1",
            params![id],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?, r.get(4)?)),
        )
        .optional()?;
    row.map(|r| txn_from_row(conn, r)).transpose()
}

fn collect_txns(conn: &Connection, sql: &str, args: &[&dyn rusqlite::ToSql]) -> Result<Vec<Transaction>, LedgerError> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(rusqlite::params_from_iter(args.iter()), |r| {
        Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?, r.get(4)?))
    })?;
    let raw: Vec<TxnRow> = rows.collect::<Result<_, _>>()?;
    let mut out = Vec::with_capacity(raw.len());
    for row in raw {
        out.push(txn_from_row(conn, row)?);
    }
    Ok(out)
}

/// Every posted transaction, ascending by date with the insertion id as a
/// stable tie-break. Reports replay from this, never from cached totals.
pub fn all_transactions(conn: &Connection) -> Result<Vec<Transaction>, LedgerError> {
    collect_txns(
        conn,
        "SELECT id, date, type, reference, description FROM transactions ORDER BY date, id",
        &[],
    )
}

/// Date-range query over the date index.
pub fn transactions_between(
    conn: &Connection,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<Transaction>, LedgerError> {
    let (from, to) = (from.to_string(), to.to_string());
    collect_txns(
        conn,
        "SELECT id, date, type, reference, description FROM transactions
         WHERE date >= ?1 AND date <= ?2 ORDER BY date, id",
        &[&from, &to],
    )
}

/// Movement totals for one account up to an optional cutoff, replayed from
/// the journal. Summed in `Decimal`, not in SQL, so TEXT amounts never
/// degrade to floats.
pub fn movement_for_account(
    conn: &Connection,
    code: &str,
    cutoff: Option<NaiveDate>,
) -> Result<(Decimal, Decimal), LedgerError> {
    let mut stmt = conn.prepare(
        "SELECT e.debit, e.credit, t.date
         FROM entries e JOIN transactions t ON e.transaction_id = t.id
         WHERE e.account_code=?1",
    )?;
    let rows = stmt.query_map(params![code], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
        ))
    })?;
    let mut debit = Decimal::ZERO;
    let mut credit = Decimal::ZERO;
    for row in rows {
        let (d, c, date) = row?;
        if let Some(cut) = cutoff {
            if parse_date(&date)? > cut {
                continue;
            }
        }
        debit += parse_amount(&d)?;
        credit += parse_amount(&c)?;
    }
    Ok((debit, credit))
}

/// Journal lines for one account joined with their transaction header,
/// ordered by (date, transaction id, line id) for running-balance replay.
pub struct AccountEntry {
    pub date: NaiveDate,
    pub transaction_id: i64,
    pub reference: String,
    pub description: String,
    pub debit: Decimal,
    pub credit: Decimal,
}

pub fn entries_for_account(
    conn: &Connection,
    code: &str,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<Vec<AccountEntry>, LedgerError> {
    let mut stmt = conn.prepare(
        "SELECT t.date, t.id, t.reference, COALESCE(e.description, t.description), e.debit, e.credit
         FROM entries e JOIN transactions t ON e.transaction_id = t.id
         WHERE e.account_code=?1 ORDER BY t.date, t.id, e.id",
    )?;
    let rows = stmt.query_map(params![code], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, i64>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, String>(4)?,
            r.get::<_, String>(5)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (date, transaction_id, reference, description, debit, credit) = row?;
        let date = parse_date(&date)?;
        if let Some(f) = from {
            if date < f {
                continue;
            }
        }
        if let Some(t) = to {
            if date > t {
                continue;
            }
        }
        out.push(AccountEntry {
            date,
            transaction_id,
            reference,
            description,
            debit: parse_amount(&debit)?,
            credit: parse_amount(&credit)?,
        });
    }
    Ok(out)
}

// -------------------------------------------------------------- satellites

pub fn insert_settlement(
    conn: &Connection,
    date: NaiveDate,
    amount: Decimal,
    method: PayMethod,
    reference: &str,
    notes: Option<&str>,
    direction: &str,
    transaction_id: i64,
) -> Result<i64, LedgerError> {
    conn.execute(
        "INSERT INTO tax_settlements(date, amount, method, reference, notes, direction, transaction_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            date.to_string(),
            amount.to_string(),
            method.as_str(),
            reference,
            notes,
            direction,
            transaction_id
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn all_settlements(conn: &Connection) -> Result<Vec<Settlement>, LedgerError> {
    let mut stmt = conn.prepare(
        "SELECT id, date, amount, method, reference, notes, direction, transaction_id
         FROM tax_settlements ORDER BY date DESC, id DESC",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, String>(4)?,
            r.get::<_, Option<String>>(5)?,
            r.get::<_, String>(6)?,
            r.get::<_, i64>(7)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (id, date, amount, method, reference, notes, direction, transaction_id) = row?;
        out.push(Settlement {
            id,
            date: parse_date(&date)?,
            amount: parse_amount(&amount)?,
            method: PayMethod::parse(&method).unwrap_or(PayMethod::Cash),
            reference,
            notes,
            direction,
            transaction_id,
        });
    }
    Ok(out)
}

pub fn insert_return(
    conn: &Connection,
    kind: TxnKind,
    counterparty: &str,
    amount: Decimal,
    date: NaiveDate,
    reason: Option<&str>,
    transaction_id: i64,
) -> Result<i64, LedgerError> {
    conn.execute(
        "INSERT INTO returns(kind, counterparty, amount, date, reason, transaction_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            kind.as_str(),
            counterparty,
            amount.to_string(),
            date.to_string(),
            reason,
            transaction_id
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn all_returns(conn: &Connection) -> Result<Vec<ReturnRecord>, LedgerError> {
    let mut stmt = conn.prepare(
        "SELECT id, kind, counterparty, amount, date, reason, transaction_id
         FROM returns ORDER BY date DESC, id DESC",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, String>(4)?,
            r.get::<_, Option<String>>(5)?,
            r.get::<_, i64>(6)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (id, kind, counterparty, amount, date, reason, transaction_id) = row?;
        let kind = TxnKind::parse(&kind).unwrap_or(TxnKind::SalesReturn);
        out.push(ReturnRecord {
            id,
            kind,
            counterparty,
            amount: parse_amount(&amount)?,
            date: parse_date(&date)?,
            reason,
            transaction_id,
        });
    }
    Ok(out)
}
