// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod accounts;
pub mod doctor;
pub mod exporter;
pub mod journal;
pub mod period;
pub mod purchases;
pub mod quick;
pub mod reports;
pub mod returns;
pub mod sale;
pub mod tax;

use anyhow::Result;
use chrono::NaiveDate;

/// Entry date from `--date`, today when omitted.
pub(crate) fn date_or_today(sub: &clap::ArgMatches) -> Result<NaiveDate> {
    match sub.get_one::<String>("date") {
        Some(s) => crate::utils::parse_date(s),
        None => Ok(chrono::Utc::now().date_naive()),
    }
}

pub(crate) fn parse_method(sub: &clap::ArgMatches) -> crate::models::PayMethod {
    sub.get_one::<String>("method")
        .and_then(|s| crate::models::PayMethod::parse(s))
        .unwrap_or(crate::models::PayMethod::Cash)
}
