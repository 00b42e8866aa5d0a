//! Command-line definition and argument extraction

use crate::dashboard::{DashboardArgs, DashboardView};
use crate::logging::LogFormat;
use crate::progress::ProgressArgs;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use legis_dashboard::ContractDimension;
use legis_milestones::Chamber;
use std::path::PathBuf;

/// A parsed invocation
#[derive(Debug, Clone)]
pub enum Invocation {
    /// `legis progress`
    Progress(ProgressArgs),
    /// `legis dashboard`
    Dashboard(DashboardArgs),
}

/// Build the `legis` command
#[must_use]
pub fn command() -> Command {
    Command::new("legis")
        .version(env!("CARGO_PKG_VERSION"))
        .about("NYS legislative bill progress and dashboard queries")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("log-format")
                .long("log-format")
                .global(true)
                .default_value("pretty")
                .value_parser(["pretty", "json"])
                .help("Log output format"),
        )
        .subcommand(
            Command::new("progress")
                .about("Show a bill's progress through the legislature")
                .arg(
                    Arg::new("history")
                        .long("history")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("JSON history of the originating bill"),
                )
                .arg(
                    Arg::new("companion")
                        .long("companion")
                        .value_parser(value_parser!(PathBuf))
                        .help("JSON history of the companion bill"),
                )
                .arg(
                    Arg::new("chamber")
                        .long("chamber")
                        .value_parser(["assembly", "senate"])
                        .help("Originating chamber, overriding the history file"),
                )
                .arg(
                    Arg::new("distinct-veto")
                        .long("distinct-veto")
                        .action(ArgAction::SetTrue)
                        .help("Report vetoes separately from delivery to the governor"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
        .subcommand(
            Command::new("dashboard")
                .about("Query the contracts and lobbying dashboards")
                .subcommand_required(true)
                .arg(
                    Arg::new("data")
                        .long("data")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("JSON store document"),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .value_parser(value_parser!(PathBuf))
                        .help("TOML dashboard configuration"),
                )
                .arg(
                    Arg::new("search")
                        .long("search")
                        .help("Filter summary rows by text"),
                )
                .arg(
                    Arg::new("sort")
                        .long("sort")
                        .help("Sort summary rows by column"),
                )
                .arg(
                    Arg::new("desc")
                        .long("desc")
                        .action(ArgAction::SetTrue)
                        .requires("sort")
                        .help("Sort descending"),
                )
                .subcommand(
                    Command::new("contracts")
                        .about("Contract totals grouped by vendor, department or type")
                        .arg(
                            Arg::new("by")
                                .long("by")
                                .default_value("vendor")
                                .value_parser(["vendor", "department", "type"])
                                .help("Grouping dimension"),
                        )
                        .arg(
                            Arg::new("drill")
                                .long("drill")
                                .value_name("GROUP")
                                .help("Expand one group"),
                        ),
                )
                .subcommand(
                    Command::new("lobbying")
                        .about("Lobbyists by reported compensation")
                        .arg(
                            Arg::new("drill")
                                .long("drill")
                                .value_name("NAME")
                                .help("List one lobbyist's clients"),
                        ),
                ),
        )
}

/// Log format selected on the command line
#[must_use]
pub fn log_format(matches: &ArgMatches) -> LogFormat {
    matches
        .get_one::<String>("log-format")
        .and_then(|s| s.parse().ok())
        .unwrap_or_default()
}

/// Extract the invocation from parsed matches
///
/// # Errors
/// If required arguments are missing, which clap normally rejects first
pub fn invocation(matches: &ArgMatches) -> anyhow::Result<Invocation> {
    match matches.subcommand() {
        Some(("progress", args)) => Ok(Invocation::Progress(ProgressArgs {
            history: required::<PathBuf>(args, "history")?,
            companion: args.get_one::<PathBuf>("companion").cloned(),
            chamber: args
                .get_one::<String>("chamber")
                .map(|c| Chamber::parse(Some(c.as_str()))),
            distinct_veto: args.get_flag("distinct-veto"),
            json: args.get_flag("json"),
        })),
        Some(("dashboard", args)) => {
            let view = match args.subcommand() {
                Some(("contracts", sub)) => DashboardView::Contracts {
                    by: required::<String>(sub, "by")?
                        .parse::<ContractDimension>()
                        .map_err(anyhow::Error::msg)?,
                    drill: sub.get_one::<String>("drill").cloned(),
                },
                Some(("lobbying", sub)) => DashboardView::Lobbying {
                    drill: sub.get_one::<String>("drill").cloned(),
                },
                _ => anyhow::bail!("dashboard requires 'contracts' or 'lobbying'"),
            };
            Ok(Invocation::Dashboard(DashboardArgs {
                data: required::<PathBuf>(args, "data")?,
                config: args.get_one::<PathBuf>("config").cloned(),
                search: args.get_one::<String>("search").cloned(),
                sort: args.get_one::<String>("sort").cloned(),
                desc: args.get_flag("desc"),
                view,
            }))
        }
        _ => anyhow::bail!("no command given"),
    }
}

fn required<T: Clone + Send + Sync + 'static>(args: &ArgMatches, id: &str) -> anyhow::Result<T> {
    args.get_one::<T>(id)
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("missing --{id}"))
}
