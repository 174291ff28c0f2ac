// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print as JSON lines"),
    )
}

fn date_arg() -> Arg {
    Arg::new("date")
        .long("date")
        .help("Entry date YYYY-MM-DD (defaults to today)")
}

fn amount_arg() -> Arg {
    Arg::new("amount").long("amount").required(true)
}

fn method_arg() -> Arg {
    Arg::new("method")
        .long("method")
        .value_parser(["cash", "bank"])
        .default_value("cash")
}

pub fn build_cli() -> Command {
    Command::new("tillbook")
        .about("Double-entry ledger for a small shop: accounts, journal, tax, reports")
        .subcommand_required(false)
        .arg_required_else_help(true)
        .subcommand(Command::new("init").about("Create the database and seed the default chart"))
        .subcommand(
            Command::new("account")
                .about("Manage the chart of accounts")
                .subcommand_required(true)
                .subcommand(
                    Command::new("add")
                        .about("Create an account")
                        .arg(Arg::new("code").long("code").required(true))
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .required(true)
                                .value_parser(["asset", "liability", "equity", "revenue", "expense"]),
                        )
                        .arg(Arg::new("parent").long("parent"))
                        .arg(Arg::new("description").long("description"))
                        .arg(
                            Arg::new("opening")
                                .long("opening")
                                .default_value("0")
                                .help("Opening balance, debit-positive"),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List accounts")
                        .arg(Arg::new("type").long("type").value_parser([
                            "asset",
                            "liability",
                            "equity",
                            "revenue",
                            "expense",
                        ])),
                ))
                .subcommand(json_flags(
                    Command::new("show")
                        .about("Show one account with its cached balance")
                        .arg(Arg::new("code").required(true)),
                ))
                .subcommand(
                    Command::new("rm")
                        .about("Delete an account with no journal activity")
                        .arg(Arg::new("code").required(true)),
                ),
        )
        .subcommand(
            Command::new("journal")
                .about("Post and inspect journal entries")
                .subcommand_required(true)
                .subcommand(
                    Command::new("post")
                        .about("Post a manual journal entry")
                        .arg(date_arg())
                        .arg(Arg::new("description").long("description").required(true))
                        .arg(Arg::new("reference").long("reference"))
                        .arg(
                            Arg::new("line")
                                .long("line")
                                .action(ArgAction::Append)
                                .required(true)
                                .help("CODE:DEBIT:CREDIT, repeat per line"),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List posted transactions")
                        .arg(Arg::new("from").long("from"))
                        .arg(Arg::new("to").long("to")),
                ))
                .subcommand(json_flags(
                    Command::new("show")
                        .about("Show one transaction with its lines")
                        .arg(Arg::new("id").required(true)),
                )),
        )
        .subcommand(
            Command::new("quick")
                .about("Two-line templates for everyday movements")
                .subcommand_required(true)
                .subcommand(
                    Command::new("receipt")
                        .about("Money in: debit the till, credit a source account")
                        .arg(date_arg())
                        .arg(amount_arg())
                        .arg(method_arg())
                        .arg(Arg::new("source").long("source").help("Credit account code"))
                        .arg(Arg::new("description").long("description")),
                )
                .subcommand(
                    Command::new("payment")
                        .about("Money out: debit an expense, credit the till")
                        .arg(date_arg())
                        .arg(amount_arg())
                        .arg(method_arg())
                        .arg(Arg::new("expense").long("expense").help("Debit account code"))
                        .arg(Arg::new("description").long("description")),
                )
                .subcommand(
                    Command::new("transfer")
                        .about("Move money between balance-sheet accounts")
                        .arg(date_arg())
                        .arg(amount_arg())
                        .arg(Arg::new("from").long("from").help("Credit account code"))
                        .arg(Arg::new("to").long("to").help("Debit account code"))
                        .arg(Arg::new("description").long("description")),
                )
                .subcommand(
                    Command::new("collect")
                        .about("Collect an outstanding customer balance")
                        .arg(date_arg())
                        .arg(amount_arg())
                        .arg(method_arg())
                        .arg(Arg::new("customer").long("customer").required(true))
                        .arg(Arg::new("reference").long("reference")),
                )
                .subcommand(
                    Command::new("pay")
                        .about("Pay down an outstanding supplier balance")
                        .arg(date_arg())
                        .arg(amount_arg())
                        .arg(method_arg())
                        .arg(Arg::new("supplier").long("supplier").required(true))
                        .arg(Arg::new("reference").long("reference")),
                ),
        )
        .subcommand(
            Command::new("sale")
                .about("Record a point-of-sale checkout")
                .arg(date_arg())
                .arg(Arg::new("subtotal").long("subtotal").required(true))
                .arg(Arg::new("discount").long("discount").default_value("0"))
                .arg(
                    Arg::new("tax-rate")
                        .long("tax-rate")
                        .default_value("0")
                        .help("Percent applied after the discount"),
                )
                .arg(
                    Arg::new("cogs")
                        .long("cogs")
                        .default_value("0")
                        .help("Cost of the goods sold"),
                )
                .arg(
                    Arg::new("method")
                        .long("method")
                        .value_parser(["cash", "bank", "credit"])
                        .default_value("cash"),
                )
                .arg(Arg::new("reference").long("reference"))
                .arg(Arg::new("description").long("description")),
        )
        .subcommand(
            Command::new("purchase")
                .about("Record goods received from a supplier")
                .arg(date_arg())
                .arg(Arg::new("subtotal").long("subtotal").required(true))
                .arg(Arg::new("discount").long("discount").default_value("0"))
                .arg(Arg::new("tax-rate").long("tax-rate").default_value("0"))
                .arg(
                    Arg::new("method")
                        .long("method")
                        .value_parser(["cash", "bank", "credit"])
                        .default_value("credit"),
                )
                .arg(Arg::new("reference").long("reference"))
                .arg(Arg::new("description").long("description")),
        )
        .subcommand(
            Command::new("return")
                .about("Record sales and purchase returns")
                .subcommand_required(true)
                .subcommand(return_cmd("sales", "Customer brings goods back"))
                .subcommand(return_cmd("purchase", "Goods sent back to a supplier"))
                .subcommand(json_flags(
                    Command::new("list").about("List recorded returns"),
                )),
        )
        .subcommand(
            Command::new("tax")
                .about("Tax position, settlements, and reporting")
                .subcommand_required(true)
                .subcommand(json_flags(
                    Command::new("position").about("Net output minus input tax right now"),
                ))
                .subcommand(
                    Command::new("settle")
                        .about("Settle the net position against cash or bank")
                        .arg(date_arg())
                        .arg(amount_arg())
                        .arg(method_arg())
                        .arg(Arg::new("reference").long("reference"))
                        .arg(Arg::new("notes").long("notes")),
                )
                .subcommand(json_flags(
                    Command::new("report")
                        .about("Tax activity over a date window")
                        .arg(Arg::new("from").long("from").required(true))
                        .arg(Arg::new("to").long("to").required(true)),
                ))
                .subcommand(json_flags(
                    Command::new("list").about("List recorded settlements"),
                )),
        )
        .subcommand(
            Command::new("report")
                .about("Ledger reports replayed from the journal")
                .subcommand_required(true)
                .subcommand(json_flags(
                    Command::new("ledger")
                        .about("General ledger for one account")
                        .arg(Arg::new("code").required(true))
                        .arg(Arg::new("from").long("from"))
                        .arg(Arg::new("to").long("to")),
                ))
                .subcommand(json_flags(
                    Command::new("trial-balance")
                        .about("Trial balance with a debit/credit closure check")
                        .arg(Arg::new("as-of").long("as-of")),
                ))
                .subcommand(json_flags(
                    Command::new("groups")
                        .about("Account-class totals and net profit")
                        .arg(Arg::new("as-of").long("as-of")),
                )),
        )
        .subcommand(
            Command::new("period")
                .about("Accounting period guard")
                .subcommand_required(true)
                .subcommand(json_flags(Command::new("show").about("Show the active period")))
                .subcommand(
                    Command::new("set")
                        .about("Replace the period window")
                        .arg(Arg::new("start").long("start").required(true))
                        .arg(Arg::new("end").long("end").required(true))
                        .arg(Arg::new("name").long("name"))
                        .arg(
                            Arg::new("forbid-past")
                                .long("forbid-past")
                                .action(ArgAction::SetTrue)
                                .help("Reject dates before the window start"),
                        )
                        .arg(
                            Arg::new("allow-future")
                                .long("allow-future")
                                .action(ArgAction::SetTrue)
                                .help("Accept dates after the window end"),
                        ),
                )
                .subcommand(Command::new("lock").about("Reject all postings"))
                .subcommand(Command::new("unlock").about("Accept postings again")),
        )
        .subcommand(
            Command::new("export")
                .about("Export data to files")
                .subcommand_required(true)
                .subcommand(
                    Command::new("journal")
                        .about("Export all transactions with their lines")
                        .arg(Arg::new("out").long("out").required(true))
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .value_parser(["csv", "json"])
                                .default_value("csv"),
                        ),
                ),
        )
        .subcommand(Command::new("doctor").about("Integrity checks: balances, closure, orphans"))
}

fn return_cmd(name: &'static str, about: &'static str) -> Command {
    Command::new(name)
        .about(about)
        .arg(date_arg())
        .arg(amount_arg())
        .arg(
            Arg::new("tax-rate")
                .long("tax-rate")
                .default_value("0")
                .help("Percent originally charged on the amount"),
        )
        .arg(
            Arg::new("method")
                .long("method")
                .value_parser(["cash", "bank", "credit"])
                .default_value("cash"),
        )
        .arg(Arg::new("counterparty").long("counterparty").required(true))
        .arg(Arg::new("reason").long("reason"))
}
