// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The five fixed account classes. An account's class never changes after
/// creation: historical trial-balance grouping depends on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Asset,
    Liability,
    Equity,
    Revenue,
    Expense,
}

impl AccountType {
    pub const ALL: [AccountType; 5] = [
        AccountType::Asset,
        AccountType::Liability,
        AccountType::Equity,
        AccountType::Revenue,
        AccountType::Expense,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Asset => "asset",
            AccountType::Liability => "liability",
            AccountType::Equity => "equity",
            AccountType::Revenue => "revenue",
            AccountType::Expense => "expense",
        }
    }

    pub fn parse(s: &str) -> Option<AccountType> {
        match s {
            "asset" => Some(AccountType::Asset),
            "liability" => Some(AccountType::Liability),
            "equity" => Some(AccountType::Equity),
            "revenue" => Some(AccountType::Revenue),
            "expense" => Some(AccountType::Expense),
            _ => None,
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub code: String,
    pub name: String,
    pub kind: AccountType,
    pub parent: Option<String>,
    pub description: Option<String>,
    /// Balance brought forward before any journal activity known here.
    /// Set once at creation.
    pub opening_balance: Decimal,
    /// Cached running balance: opening_balance + sum(debit - credit) over
    /// every posted line touching this account. Only the journal engine
    /// mutates it, exactly once per posted line.
    pub balance: Decimal,
}

/// Transaction tag. Informational: posting rules are identical for all
/// kinds, the tag only drives reference prefixes and tax reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxnKind {
    Manual,
    Sale,
    Purchase,
    SalesReturn,
    PurchaseReturn,
    Receipt,
    Payment,
    Transfer,
    TaxSettlement,
}

impl TxnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxnKind::Manual => "manual",
            TxnKind::Sale => "sale",
            TxnKind::Purchase => "purchase",
            TxnKind::SalesReturn => "sales_return",
            TxnKind::PurchaseReturn => "purchase_return",
            TxnKind::Receipt => "receipt",
            TxnKind::Payment => "payment",
            TxnKind::Transfer => "transfer",
            TxnKind::TaxSettlement => "tax_settlement",
        }
    }

    pub fn parse(s: &str) -> Option<TxnKind> {
        match s {
            "manual" => Some(TxnKind::Manual),
            "sale" => Some(TxnKind::Sale),
            "purchase" => Some(TxnKind::Purchase),
            "sales_return" => Some(TxnKind::SalesReturn),
            "purchase_return" => Some(TxnKind::PurchaseReturn),
            "receipt" => Some(TxnKind::Receipt),
            "payment" => Some(TxnKind::Payment),
            "transfer" => Some(TxnKind::Transfer),
            "tax_settlement" => Some(TxnKind::TaxSettlement),
            _ => None,
        }
    }

    /// Prefix used when a reference is auto-assigned at posting time.
    pub fn reference_prefix(&self) -> &'static str {
        match self {
            TxnKind::Manual => "JE",
            TxnKind::Sale => "INV",
            TxnKind::Purchase => "PUR",
            TxnKind::SalesReturn => "SR",
            TxnKind::PurchaseReturn => "PR",
            TxnKind::Receipt => "REC",
            TxnKind::Payment => "PAY",
            TxnKind::Transfer => "TRF",
            TxnKind::TaxSettlement => "TAX",
        }
    }
}

impl fmt::Display for TxnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One side of a journal entry. Exactly one of debit/credit is non-zero;
/// the journal engine rejects anything else.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalLine {
    pub account_code: String,
    pub debit: Decimal,
    pub credit: Decimal,
    pub description: Option<String>,
}

impl JournalLine {
    pub fn debit(account_code: impl Into<String>, amount: Decimal) -> Self {
        JournalLine {
            account_code: account_code.into(),
            debit: amount,
            credit: Decimal::ZERO,
            description: None,
        }
    }

    pub fn credit(account_code: impl Into<String>, amount: Decimal) -> Self {
        JournalLine {
            account_code: account_code.into(),
            debit: Decimal::ZERO,
            credit: amount,
            description: None,
        }
    }

    pub fn with_description(mut self, d: impl Into<String>) -> Self {
        self.description = Some(d.into());
        self
    }
}

/// A posted, immutable journal entry. Corrections are made by posting a
/// reversing entry, never by editing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub date: NaiveDate,
    pub kind: TxnKind,
    pub reference: String,
    pub description: String,
    pub lines: Vec<JournalLine>,
}

impl Transaction {
    pub fn total_debit(&self) -> Decimal {
        self.lines.iter().map(|l| l.debit).sum()
    }

    pub fn total_credit(&self) -> Decimal {
        self.lines.iter().map(|l| l.credit).sum()
    }
}

/// A transaction candidate assembled by a caller or a builder, not yet
/// validated or persisted.
#[derive(Debug, Clone)]
pub struct Draft {
    pub date: NaiveDate,
    pub kind: TxnKind,
    pub reference: Option<String>,
    pub description: String,
    pub lines: Vec<JournalLine>,
}

impl Draft {
    pub fn new(date: NaiveDate, kind: TxnKind, description: impl Into<String>) -> Self {
        Draft {
            date,
            kind,
            reference: None,
            description: description.into(),
            lines: Vec::new(),
        }
    }

    pub fn with_reference(mut self, r: Option<String>) -> Self {
        self.reference = r;
        self
    }

    pub fn line(mut self, line: JournalLine) -> Self {
        self.lines.push(line);
        self
    }
}

/// How money moved for quick templates, sales, and purchases. `Credit`
/// means on-account (receivable for a sale, payable for a purchase).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayMethod {
    Cash,
    Bank,
    Credit,
}

impl PayMethod {
    pub fn parse(s: &str) -> Option<PayMethod> {
        match s {
            "cash" => Some(PayMethod::Cash),
            "bank" => Some(PayMethod::Bank),
            "credit" => Some(PayMethod::Credit),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PayMethod::Cash => "cash",
            PayMethod::Bank => "bank",
            PayMethod::Credit => "credit",
        }
    }
}

/// Satellite record written alongside a tax settlement posting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settlement {
    pub id: i64,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub method: PayMethod,
    pub reference: String,
    pub notes: Option<String>,
    /// "payment" when net tax was payable, "refund" when receivable.
    pub direction: String,
    pub transaction_id: i64,
}

/// Satellite record written alongside a sales/purchase return posting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnRecord {
    pub id: i64,
    pub kind: TxnKind,
    pub counterparty: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub reason: Option<String>,
    pub transaction_id: i64,
}
