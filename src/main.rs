use std::process;

use clap::{value_parser, Arg, ArgAction, Command};
use colored::*;

use gh_aac::commands::{handle_export, handle_init};
use gh_aac::logging::{get_log_file_path, init_logging, install_panic_hook};

fn cli() -> Command {
    Command::new("gh-aac")
        .about("Export GitHub organization access as code")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Config file (default is $HOME/.gh-aac.yaml)")
                .global(true),
        )
        .arg(
            Arg::new("endpoint")
                .long("endpoint")
                .short('e')
                .value_name("URL")
                .help("GitHub Enterprise URL (default is https://github.com)")
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Echo progress to stderr")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("export")
                .about("Write the access snapshot of each organization")
                .arg(
                    Arg::new("org")
                        .long("org")
                        .short('o')
                        .value_name("ORG")
                        .help("Export only this organization"),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .value_name("FORMAT")
                        .value_parser(["yaml", "json"])
                        .help("Output format (default is yaml)"),
                )
                .arg(
                    Arg::new("output-dir")
                        .long("output-dir")
                        .short('d')
                        .value_name("DIR")
                        .help("Directory for the exported files (default is the current directory)"),
                )
                .arg(
                    Arg::new("order")
                        .long("order")
                        .value_name("ORDER")
                        .value_parser(["name", "created-at"])
                        .help("Repository order (default is name)"),
                )
                .arg(
                    Arg::new("jobs")
                        .long("jobs")
                        .short('j')
                        .value_name("N")
                        .value_parser(value_parser!(usize))
                        .help("Organizations exported at the same time"),
                ),
        )
        .subcommand(
            Command::new("init")
                .about("Initialize a directory for an organization's access config")
                .arg(
                    Arg::new("org")
                        .long("org")
                        .short('o')
                        .value_name("ORG")
                        .help("Organization login")
                        .required(true),
                )
                .arg(
                    Arg::new("dir")
                        .long("dir")
                        .short('d')
                        .value_name("DIR")
                        .help("Working directory (default is the current directory)"),
                ),
        )
}

#[tokio::main]
async fn main() {
    let matches = cli().get_matches();

    install_panic_hook();
    if let Err(e) = init_logging(matches.get_flag("verbose")) {
        eprintln!("{} could not open log file: {}", "warning:".yellow().bold(), e);
    }

    let result = match matches.subcommand() {
        Some(("export", sub_matches)) => handle_export(sub_matches).await,
        Some(("init", sub_matches)) => handle_init(sub_matches).await,
        _ => {
            eprintln!("Unknown command. Use 'gh-aac --help' for available commands.");
            process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        if let Some(path) = get_log_file_path() {
            eprintln!("{}", format!("See {} for details", path.display()).dimmed());
        }
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_definition_is_valid() {
        cli().debug_assert();
    }

    #[test]
    fn global_flags_reach_subcommands() {
        let matches = cli()
            .try_get_matches_from(["gh-aac", "export", "--config", "aac.yaml", "--jobs", "2"])
            .unwrap();
        let (_, export) = matches.subcommand().unwrap();

        assert_eq!(export.get_one::<String>("config").unwrap(), "aac.yaml");
        assert_eq!(*export.get_one::<usize>("jobs").unwrap(), 2);
    }

    #[test]
    fn init_requires_org() {
        assert!(cli().try_get_matches_from(["gh-aac", "init"]).is_err());
    }
}
