// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Chart of accounts registry: typed, parented accounts keyed by a stable
//! numeric code. Parent links stay inside one top-level class; deletion is
//! blocked while any journal line references the code.

use crate::errors::LedgerError;
use crate::models::{Account, AccountType};
use crate::store;
use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::Connection;
use rust_decimal::Decimal;

static CODE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{2,8}$").expect("valid regex"));

/// Well-known codes the posting builders rely on. They mirror the seeded
/// chart; a reseeded or imported chart must keep these stable.
pub mod codes {
    pub const CASH: &str = "1010";
    pub const BANK: &str = "1020";
    pub const INVENTORY: &str = "1030";
    pub const RECEIVABLE: &str = "1040";
    pub const INPUT_TAX: &str = "1070";
    pub const PAYABLE: &str = "2010";
    pub const OUTPUT_TAX: &str = "2041";
    pub const SALES: &str = "4010";
    pub const SALES_DISCOUNTS: &str = "4030";
    pub const COGS: &str = "5010";
    pub const GENERAL_EXPENSES: &str = "5020";
}

pub struct AccountSpec {
    pub code: String,
    pub name: String,
    pub kind: AccountType,
    pub parent: Option<String>,
    pub description: Option<String>,
    pub opening_balance: Decimal,
}

pub fn create_account(conn: &Connection, spec: AccountSpec) -> Result<Account, LedgerError> {
    if !CODE_RE.is_match(&spec.code) {
        return Err(LedgerError::InvalidCode(spec.code));
    }
    if store::get_account(conn, &spec.code)?.is_some() {
        return Err(LedgerError::DuplicateCode(spec.code));
    }
    if let Some(parent) = &spec.parent {
        match store::get_account(conn, parent)? {
            Some(p) if p.kind == spec.kind => {}
            _ => {
                return Err(LedgerError::InvalidParent {
                    parent: parent.clone(),
                    kind: spec.kind,
                });
            }
        }
    }
    let account = Account {
        code: spec.code,
        name: spec.name,
        kind: spec.kind,
        parent: spec.parent,
        description: spec.description,
        opening_balance: spec.opening_balance,
        // the cache starts at the brought-forward balance
        balance: spec.opening_balance,
    };
    store::save_account(conn, &account)?;
    Ok(account)
}

pub fn get_account(conn: &Connection, code: &str) -> Result<Account, LedgerError> {
    store::get_account(conn, code)?.ok_or_else(|| LedgerError::UnknownAccount(code.to_string()))
}

pub fn list_accounts(
    conn: &Connection,
    kind: Option<AccountType>,
) -> Result<Vec<Account>, LedgerError> {
    let mut accounts = store::all_accounts(conn)?;
    if let Some(k) = kind {
        accounts.retain(|a| a.kind == k);
    }
    Ok(accounts)
}

pub fn account_type(conn: &Connection, code: &str) -> Result<AccountType, LedgerError> {
    Ok(get_account(conn, code)?.kind)
}

/// Deletion requires the full referenced-by-journal scan first; a dangling
/// code would break every report replay.
pub fn delete_account(conn: &Connection, code: &str) -> Result<(), LedgerError> {
    let account = get_account(conn, code)?;
    if store::account_has_entries(conn, &account.code)? {
        return Err(LedgerError::HasTransactions(account.code));
    }
    store::delete_account_row(conn, &account.code)
}

/// The chart the original system ships with. Idempotent: codes that
/// already exist are left untouched.
pub fn seed_default_chart(conn: &Connection) -> Result<usize, LedgerError> {
    use AccountType::*;
    let seed: [(&str, &str, AccountType, Option<&str>); 18] = [
        ("1000", "Assets", Asset, None),
        (codes::CASH, "Cash", Asset, Some("1000")),
        (codes::BANK, "Bank", Asset, Some("1000")),
        (codes::INVENTORY, "Inventory", Asset, Some("1000")),
        (codes::RECEIVABLE, "Accounts receivable", Asset, Some("1000")),
        (codes::INPUT_TAX, "Input tax", Asset, Some("1000")),
        ("2000", "Liabilities", Liability, None),
        (codes::PAYABLE, "Accounts payable", Liability, Some("2000")),
        ("2040", "Taxes payable", Liability, Some("2000")),
        (codes::OUTPUT_TAX, "Output tax", Liability, Some("2040")),
        ("3000", "Equity", Equity, None),
        ("3010", "Capital", Equity, Some("3000")),
        ("4000", "Revenue", Revenue, None),
        (codes::SALES, "Sales", Revenue, Some("4000")),
        (codes::SALES_DISCOUNTS, "Sales discounts", Revenue, Some("4000")),
        ("5000", "Expenses", Expense, None),
        (codes::COGS, "Cost of goods sold", Expense, Some("5000")),
        (codes::GENERAL_EXPENSES, "General expenses", Expense, Some("5000")),
    ];
    let mut created = 0;
    for (code, name, kind, parent) in seed {
        if store::get_account(conn, code)?.is_some() {
            continue;
        }
        create_account(
            conn,
            AccountSpec {
                code: code.to_string(),
                name: name.to_string(),
                kind,
                parent: parent.map(str::to_string),
                description: None,
                opening_balance: Decimal::ZERO,
            },
        )?;
        created += 1;
    }
    Ok(created)
}
