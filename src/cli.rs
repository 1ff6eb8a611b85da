// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, arg, command};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(arg!(--json "Print as pretty JSON").action(ArgAction::SetTrue))
        .arg(
            arg!(--jsonl "Print as JSON lines")
                .action(ArgAction::SetTrue)
                .conflicts_with("json"),
        )
}

fn kind_arg(required: bool) -> Arg {
    Arg::new("kind")
        .long("kind")
        .value_parser(["income", "expense"])
        .required(required)
        .help("Transaction kind")
}

fn final_arg() -> Arg {
    Arg::new("final")
        .long("final")
        .value_name("AMOUNT")
        .help("Final quotation")
}

pub fn build_cli() -> Command {
    command!()
        .about("Project finance tracker for construction sites")
        .arg(
            arg!(-v --verbose "Log debug output to stderr")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(
            Command::new("config")
                .about("Read and change settings")
                .subcommand(Command::new("list"))
                .subcommand(Command::new("get").arg(arg!(<key>)))
                .subcommand(Command::new("set").arg(arg!(<key>)).arg(arg!(<value>))),
        )
        .subcommand(
            Command::new("status")
                .about("Project statuses")
                .subcommand(Command::new("add").arg(arg!(<name>)))
                .subcommand(Command::new("list"))
                .subcommand(Command::new("rm").arg(arg!(<name>))),
        )
        .subcommand(
            Command::new("category")
                .about("Expense categories")
                .subcommand(Command::new("add").arg(arg!(<name>)))
                .subcommand(Command::new("list"))
                .subcommand(Command::new("rm").arg(arg!(<name>))),
        )
        .subcommand(
            Command::new("project")
                .about("Projects (sites)")
                .subcommand(
                    Command::new("add")
                        .arg(arg!(--name <NAME>).required(true))
                        .arg(arg!(--initial <AMOUNT> "Initial quotation").required(true))
                        .arg(final_arg().required(true))
                        .arg(arg!(--status <STATUS>).default_value("Ongoing")),
                )
                .subcommand(
                    Command::new("edit")
                        .arg(arg!(<id>))
                        .arg(arg!(--name <NAME>))
                        .arg(arg!(--initial <AMOUNT>))
                        .arg(final_arg())
                        .arg(arg!(--status <STATUS>)),
                )
                .subcommand(json_flags(
                    Command::new("list").arg(
                        arg!(--limit <N> "Number of projects to show")
                            .value_parser(clap::value_parser!(usize)),
                    ),
                ))
                .subcommand(json_flags(Command::new("show").arg(arg!(<id>)))),
        )
        .subcommand(
            Command::new("tx")
                .about("Income and expense entries")
                .subcommand(
                    Command::new("add")
                        .arg(arg!(--project <ID>).required(true))
                        .arg(kind_arg(true))
                        .arg(arg!(--amount <AMOUNT>).required(true))
                        .arg(arg!(--category <NAME> "Expense category"))
                        .arg(arg!(--remarks <TEXT>))
                        .arg(arg!(--at <TIMESTAMP> "RFC 3339 or YYYY-MM-DD, defaults to now")),
                )
                .subcommand(
                    Command::new("edit")
                        .arg(arg!(<id>))
                        .arg(kind_arg(true))
                        .arg(arg!(--amount <AMOUNT>).required(true))
                        .arg(arg!(--category <NAME>))
                        .arg(arg!(--remarks <TEXT>)),
                )
                .subcommand(Command::new("rm").arg(arg!(<id>)).arg(kind_arg(true)))
                .subcommand(json_flags(
                    Command::new("list")
                        .arg(arg!(--project <ID>).required(true))
                        .arg(kind_arg(false))
                        .arg(arg!(--category <NAME> "Only expenses in this category"))
                        .arg(
                            Arg::new("match")
                                .long("match")
                                .value_name("REGEX")
                                .help("Filter on description and remarks"),
                        )
                        .arg(arg!(--limit <N>).value_parser(clap::value_parser!(usize))),
                )),
        )
        .subcommand(
            Command::new("attachment")
                .about("Attachment references")
                .subcommand(
                    Command::new("add")
                        .arg(arg!(--project <ID>).required(true))
                        .arg(arg!(--name <NAME>).required(true))
                        .arg(arg!(--location <URL_OR_PATH>).required(true)),
                )
                .subcommand(json_flags(
                    Command::new("list").arg(arg!(--project <ID>).required(true)),
                ))
                .subcommand(Command::new("rm").arg(arg!(<id>))),
        )
        .subcommand(
            Command::new("report").about("Reports").subcommand(json_flags(
                Command::new("summary").arg(arg!(--project <ID>).required(true)),
            )),
        )
        .subcommand(
            Command::new("export").about("Export data").subcommand(
                Command::new("transactions")
                    .arg(arg!(--project <ID>).required(true))
                    .arg(arg!(--format <FORMAT> "csv|json").required(true))
                    .arg(arg!(--out <PATH>).required(true)),
            ),
        )
        .subcommand(Command::new("doctor").about("Check data consistency"))
}
