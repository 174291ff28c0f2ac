// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Reporting layer. Every report here replays the journal instead of
//! trusting the cached account balances; `reconcile_accounts` is the one
//! place the two are compared.

use crate::chart::codes;
use crate::errors::LedgerError;
use crate::journal::BALANCE_TOLERANCE;
use crate::models::AccountType;
use crate::store;
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

// ---------------------------------------------------------- general ledger

#[derive(Debug, Serialize)]
pub struct LedgerRow {
    pub date: NaiveDate,
    pub transaction_id: i64,
    pub reference: String,
    pub description: String,
    pub debit: Decimal,
    pub credit: Decimal,
    /// Running balance after this line.
    pub balance: Decimal,
}

#[derive(Debug, Serialize)]
pub struct LedgerReport {
    pub account_code: String,
    pub account_name: String,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    /// Brought-forward plus all movement before `from`.
    pub opening_balance: Decimal,
    pub rows: Vec<LedgerRow>,
    pub total_debit: Decimal,
    pub total_credit: Decimal,
    pub closing_balance: Decimal,
}

/// Replay one account's lines in posting order. Movement before the window
/// folds into the opening balance so the running balance is correct from
/// the first visible row.
pub fn general_ledger(
    conn: &Connection,
    code: &str,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<LedgerReport, LedgerError> {
    let account = store::get_account(conn, code)?
        .ok_or_else(|| LedgerError::UnknownAccount(code.to_string()))?;

    let mut opening = account.opening_balance;
    let mut rows = Vec::new();
    let mut total_debit = Decimal::ZERO;
    let mut total_credit = Decimal::ZERO;
    let mut running = opening;

    for entry in store::entries_for_account(conn, code, None, to)? {
        if let Some(f) = from {
            if entry.date < f {
                opening += entry.debit - entry.credit;
                running = opening;
                continue;
            }
        }
        running += entry.debit - entry.credit;
        total_debit += entry.debit;
        total_credit += entry.credit;
        rows.push(LedgerRow {
            date: entry.date,
            transaction_id: entry.transaction_id,
            reference: entry.reference,
            description: entry.description,
            debit: entry.debit,
            credit: entry.credit,
            balance: running,
        });
    }

    Ok(LedgerReport {
        account_code: account.code,
        account_name: account.name,
        from,
        to,
        opening_balance: opening,
        rows,
        total_debit,
        total_credit,
        closing_balance: running,
    })
}

// ----------------------------------------------------------- trial balance

/// A signed balance split into ledger columns: positive lands in the
/// debit column, negative in the credit column as an absolute value.
fn sign_split(signed: Decimal) -> (Decimal, Decimal) {
    if signed >= Decimal::ZERO {
        (signed, Decimal::ZERO)
    } else {
        (Decimal::ZERO, -signed)
    }
}

#[derive(Debug, Serialize)]
pub struct TrialBalanceRow {
    pub code: String,
    pub name: String,
    pub kind: AccountType,
    pub opening_debit: Decimal,
    pub opening_credit: Decimal,
    pub movement_debit: Decimal,
    pub movement_credit: Decimal,
    pub closing_debit: Decimal,
    pub closing_credit: Decimal,
}

#[derive(Debug, Default, Serialize)]
pub struct TrialBalanceTotals {
    pub opening_debit: Decimal,
    pub opening_credit: Decimal,
    pub movement_debit: Decimal,
    pub movement_credit: Decimal,
    pub closing_debit: Decimal,
    pub closing_credit: Decimal,
}

#[derive(Debug, Serialize)]
pub struct TrialBalance {
    pub as_of: Option<NaiveDate>,
    pub rows: Vec<TrialBalanceRow>,
    pub totals: TrialBalanceTotals,
    pub is_balanced: bool,
}

/// Opening, window movement, and closing column pairs per account,
/// replayed from the journal. Accounts with zero opening and no movement
/// are omitted; they would contribute nothing to any column.
pub fn trial_balance(
    conn: &Connection,
    as_of: Option<NaiveDate>,
) -> Result<TrialBalance, LedgerError> {
    let mut rows = Vec::new();
    let mut totals = TrialBalanceTotals::default();

    for account in store::all_accounts(conn)? {
        let (movement_debit, movement_credit) =
            store::movement_for_account(conn, &account.code, as_of)?;
        if account.opening_balance.is_zero()
            && movement_debit.is_zero()
            && movement_credit.is_zero()
        {
            continue;
        }
        let (opening_debit, opening_credit) = sign_split(account.opening_balance);
        let (closing_debit, closing_credit) =
            sign_split(account.opening_balance + movement_debit - movement_credit);

        totals.opening_debit += opening_debit;
        totals.opening_credit += opening_credit;
        totals.movement_debit += movement_debit;
        totals.movement_credit += movement_credit;
        totals.closing_debit += closing_debit;
        totals.closing_credit += closing_credit;
        rows.push(TrialBalanceRow {
            code: account.code,
            name: account.name,
            kind: account.kind,
            opening_debit,
            opening_credit,
            movement_debit,
            movement_credit,
            closing_debit,
            closing_credit,
        });
    }

    let is_balanced = (totals.opening_debit - totals.opening_credit).abs() <= *BALANCE_TOLERANCE
        && (totals.movement_debit - totals.movement_credit).abs() <= *BALANCE_TOLERANCE
        && (totals.closing_debit - totals.closing_credit).abs() <= *BALANCE_TOLERANCE;
    Ok(TrialBalance {
        as_of,
        rows,
        totals,
        is_balanced,
    })
}

// ---------------------------------------------------------- account groups

#[derive(Debug, Serialize)]
pub struct GroupAccount {
    pub code: String,
    pub name: String,
    /// Natural-positive: debit-positive for assets and expenses,
    /// credit-positive for the other classes.
    pub balance: Decimal,
}

#[derive(Debug, Serialize)]
pub struct GroupSection {
    pub kind: AccountType,
    pub accounts: Vec<GroupAccount>,
    pub total: Decimal,
}

#[derive(Debug, Serialize)]
pub struct GroupReport {
    pub as_of: Option<NaiveDate>,
    pub sections: Vec<GroupSection>,
    /// Revenue total minus expense total, positive when profitable.
    pub net_profit: Decimal,
}

pub fn account_groups(
    conn: &Connection,
    as_of: Option<NaiveDate>,
) -> Result<GroupReport, LedgerError> {
    let accounts = store::all_accounts(conn)?;
    let mut sections: Vec<GroupSection> = AccountType::ALL
        .iter()
        .map(|k| GroupSection {
            kind: *k,
            accounts: Vec::new(),
            total: Decimal::ZERO,
        })
        .collect();

    for account in accounts {
        let (debit, credit) = store::movement_for_account(conn, &account.code, as_of)?;
        let signed = account.opening_balance + debit - credit;
        let natural = match account.kind {
            AccountType::Asset | AccountType::Expense => signed,
            _ => -signed,
        };
        let section = sections
            .iter_mut()
            .find(|s| s.kind == account.kind)
            .expect("all classes present");
        section.total += natural;
        section.accounts.push(GroupAccount {
            code: account.code,
            name: account.name,
            balance: natural,
        });
    }

    let revenue = sections
        .iter()
        .find(|s| s.kind == AccountType::Revenue)
        .map(|s| s.total)
        .unwrap_or_default();
    let expenses = sections
        .iter()
        .find(|s| s.kind == AccountType::Expense)
        .map(|s| s.total)
        .unwrap_or_default();

    Ok(GroupReport {
        as_of,
        sections,
        net_profit: revenue - expenses,
    })
}

// ------------------------------------------------------------ tax position

#[derive(Debug, Serialize)]
pub struct TaxPosition {
    /// Output tax owed, credit-positive.
    pub output_balance: Decimal,
    /// Input tax reclaimable, debit-positive.
    pub input_balance: Decimal,
    /// output - input; positive means payable to the authority.
    pub net: Decimal,
    pub status: String,
}

/// Current position from the cached tax account balances.
pub fn tax_position(conn: &Connection) -> Result<TaxPosition, LedgerError> {
    let output = store::get_account(conn, codes::OUTPUT_TAX)?
        .ok_or_else(|| LedgerError::UnknownAccount(codes::OUTPUT_TAX.into()))?;
    let input = store::get_account(conn, codes::INPUT_TAX)?
        .ok_or_else(|| LedgerError::UnknownAccount(codes::INPUT_TAX.into()))?;
    let output_balance = -output.balance;
    let input_balance = input.balance;
    let net = output_balance - input_balance;
    let status = if net > Decimal::ZERO {
        "payable"
    } else if net < Decimal::ZERO {
        "receivable"
    } else {
        "settled"
    };
    Ok(TaxPosition {
        output_balance,
        input_balance,
        net,
        status: status.to_string(),
    })
}

#[derive(Debug, Serialize)]
pub struct TaxReport {
    pub from: NaiveDate,
    pub to: NaiveDate,
    /// Output tax collected in the window, credit-positive.
    pub output_tax: Decimal,
    /// Input tax paid in the window, debit-positive.
    pub input_tax: Decimal,
    pub net: Decimal,
}

/// Window activity on the two tax accounts, replayed from the journal.
/// Settlement postings land on the same accounts and net out naturally.
pub fn tax_report(
    conn: &Connection,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<TaxReport, LedgerError> {
    let mut output_tax = Decimal::ZERO;
    for e in store::entries_for_account(conn, codes::OUTPUT_TAX, Some(from), Some(to))? {
        output_tax += e.credit - e.debit;
    }
    let mut input_tax = Decimal::ZERO;
    for e in store::entries_for_account(conn, codes::INPUT_TAX, Some(from), Some(to))? {
        input_tax += e.debit - e.credit;
    }
    Ok(TaxReport {
        from,
        to,
        output_tax,
        input_tax,
        net: output_tax - input_tax,
    })
}

// ---------------------------------------------------------- reconciliation

#[derive(Debug, Serialize)]
pub struct Discrepancy {
    pub code: String,
    pub name: String,
    pub cached: Decimal,
    pub replayed: Decimal,
    pub difference: Decimal,
}

fn drift_for(conn: &Connection, account: crate::models::Account) -> Result<Option<Discrepancy>, LedgerError> {
    let (debit, credit) = store::movement_for_account(conn, &account.code, None)?;
    let replayed = account.opening_balance + debit - credit;
    if replayed == account.balance {
        return Ok(None);
    }
    Ok(Some(Discrepancy {
        code: account.code,
        name: account.name,
        cached: account.balance,
        replayed,
        difference: account.balance - replayed,
    }))
}

/// Recompute one account from scratch and report any divergence from its
/// cached balance.
pub fn reconcile_account(conn: &Connection, code: &str) -> Result<Option<Discrepancy>, LedgerError> {
    let account = store::get_account(conn, code)?
        .ok_or_else(|| LedgerError::UnknownAccount(code.to_string()))?;
    drift_for(conn, account)
}

/// Compare every cached balance against a full journal replay. A non-empty
/// result means a balance was mutated outside the journal engine.
pub fn reconcile_accounts(conn: &Connection) -> Result<Vec<Discrepancy>, LedgerError> {
    let mut out = Vec::new();
    for account in store::all_accounts(conn)? {
        if let Some(d) = drift_for(conn, account)? {
            out.push(d);
        }
    }
    Ok(out)
}
