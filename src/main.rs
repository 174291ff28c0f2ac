// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use tillbook::{chart, cli, commands, db};

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let mut conn = db::open_or_init()?;

    match matches.subcommand() {
        Some(("init", _)) => {
            let created = chart::seed_default_chart(&conn)?;
            println!(
                "Database initialized at {} ({} accounts seeded)",
                db::db_path()?.display(),
                created
            );
        }
        Some(("account", sub)) => commands::accounts::handle(&conn, sub)?,
        Some(("journal", sub)) => commands::journal::handle(&mut conn, sub)?,
        Some(("quick", sub)) => commands::quick::handle(&mut conn, sub)?,
        Some(("sale", sub)) => commands::sale::handle(&mut conn, sub)?,
        Some(("purchase", sub)) => commands::purchases::handle(&mut conn, sub)?,
        Some(("return", sub)) => commands::returns::handle(&mut conn, sub)?,
        Some(("tax", sub)) => commands::tax::handle(&mut conn, sub)?,
        Some(("report", sub)) => commands::reports::handle(&conn, sub)?,
        Some(("period", sub)) => commands::period::handle(&conn, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&conn, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&conn)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
