// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::AccountType;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// Typed rejection reasons for ledger operations. Validation failures are
/// reported before any write; a rejected operation leaves state untouched.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("account code '{0}' already exists")]
    DuplicateCode(String),

    #[error("account code '{0}' is invalid (expected 2-8 digits)")]
    InvalidCode(String),

    #[error("'{0}' is not an account type (asset|liability|equity|revenue|expense)")]
    InvalidType(String),

    #[error("parent account '{parent}' is missing or not a {kind} account")]
    InvalidParent { parent: String, kind: AccountType },

    #[error("account '{0}' does not exist")]
    UnknownAccount(String),

    #[error("line {index} must carry exactly one of debit or credit, both positive-or-zero")]
    MalformedLine { index: usize },

    #[error("entry is unbalanced: debits minus credits is {difference}")]
    Unbalanced { difference: Decimal },

    #[error("an entry needs at least two lines touching two distinct accounts")]
    InsufficientLines,

    #[error("the accounting period is locked")]
    PeriodLocked,

    #[error("{date} is before the period start {start} and past entries are disallowed")]
    BeforePeriodStart { date: NaiveDate, start: NaiveDate },

    #[error("{date} is after the period end {end} and future entries are disallowed")]
    AfterPeriodEnd { date: NaiveDate, end: NaiveDate },

    #[error("account '{0}' has posted entries and cannot be deleted")]
    HasTransactions(String),

    #[error("settlement amount {amount} exceeds the net tax position {net}")]
    AmountExceedsNetTax { amount: Decimal, net: Decimal },

    #[error("amount must be greater than zero")]
    NonPositiveAmount,

    #[error("stored value '{0}' could not be decoded")]
    CorruptRecord(String),

    #[error("storage error")]
    Storage(#[from] rusqlite::Error),
}

impl LedgerError {
    /// True for caller-correctable rejections, false for infrastructure
    /// failures worth retrying from the top.
    pub fn is_validation(&self) -> bool {
        !matches!(self, LedgerError::Storage(_) | LedgerError::CorruptRecord(_))
    }
}
