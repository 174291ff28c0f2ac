// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The period guard. A `Period` is an explicit value loaded from settings
//! and handed to the journal engine, so tests can run several period
//! configurations side by side. The check is advisory: changing the
//! configuration never re-validates history.

use crate::errors::LedgerError;
use crate::utils::{get_setting, set_setting};
use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

pub const PERIOD_SETTING_KEY: &str = "accounting_period";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Period {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub period_name: String,
    pub is_locked: bool,
    pub allow_past_transactions: bool,
    pub allow_future_transactions: bool,
}

impl Period {
    /// The calendar year around `today`, unlocked, past entries allowed,
    /// future entries not.
    pub fn default_for(today: NaiveDate) -> Period {
        let year = today.year();
        Period {
            // Jan 1 / Dec 31 always exist
            start_date: NaiveDate::from_ymd_opt(year, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(year, 12, 31).unwrap(),
            period_name: format!("Fiscal year {}", year),
            is_locked: false,
            allow_past_transactions: true,
            allow_future_transactions: false,
        }
    }

    /// Gate every posting on the period configuration. A locked period
    /// rejects regardless of date.
    pub fn check_date(&self, date: NaiveDate) -> Result<(), LedgerError> {
        if self.is_locked {
            return Err(LedgerError::PeriodLocked);
        }
        if date < self.start_date && !self.allow_past_transactions {
            return Err(LedgerError::BeforePeriodStart {
                date,
                start: self.start_date,
            });
        }
        if date > self.end_date && !self.allow_future_transactions {
            return Err(LedgerError::AfterPeriodEnd {
                date,
                end: self.end_date,
            });
        }
        Ok(())
    }
}

pub fn load(conn: &Connection) -> Result<Period> {
    match get_setting(conn, PERIOD_SETTING_KEY)? {
        Some(raw) => Ok(serde_json::from_str(&raw)?),
        None => Ok(Period::default_for(chrono::Utc::now().date_naive())),
    }
}

pub fn save(conn: &Connection, period: &Period) -> Result<()> {
    set_setting(conn, PERIOD_SETTING_KEY, &serde_json::to_string(period)?)
}
