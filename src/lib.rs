// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod chart;
pub mod cli;
pub mod commands;
pub mod db;
pub mod errors;
pub mod journal;
pub mod models;
pub mod period;
pub mod reports;
pub mod store;
pub mod utils;
