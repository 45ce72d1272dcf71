use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;
mod logging;

fn cli() -> Command {
    Command::new("dialogue")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Migrate, validate and import dialog-project documents")
        .subcommand_required(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::Count)
                .help("Increase log verbosity (-v debug, -vv trace)"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines"),
        )
        .subcommand(
            Command::new("import")
                .about("Run the full ingestion pipeline over a file")
                .arg(file_arg())
                .arg(
                    Arg::new("config")
                        .long("config")
                        .value_parser(value_parser!(PathBuf))
                        .help("TOML file with import limits"),
                )
                .arg(json_arg()),
        )
        .subcommand(
            Command::new("migrate")
                .about("Upgrade a legacy project to the current schema")
                .arg(file_arg())
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_parser(value_parser!(PathBuf))
                        .help("Write the migrated project here instead of stdout"),
                ),
        )
        .subcommand(
            Command::new("validate")
                .about("Check the graph integrity of a current-schema project")
                .arg(file_arg())
                .arg(json_arg()),
        )
}

fn file_arg() -> Arg {
    Arg::new("file")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Project document")
}

fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Output as JSON")
}

async fn run(matches: &ArgMatches) -> anyhow::Result<ExitCode> {
    match matches.subcommand() {
        Some(("import", args)) => commands::import(args).await,
        Some(("migrate", args)) => commands::migrate(args),
        Some(("validate", args)) => commands::validate(args),
        _ => anyhow::bail!("unknown command"),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let matches = cli().get_matches();
    logging::init(matches.get_count("verbose"), matches.get_flag("log-json"));

    match run(&matches).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        cli().debug_assert();
    }

    #[test]
    fn global_flags_after_subcommand() {
        let matches = cli()
            .try_get_matches_from(["dialogue", "validate", "p.json", "-vv", "--log-json"])
            .unwrap();
        assert_eq!(matches.get_count("verbose"), 2);
        assert!(matches.get_flag("log-json"));
    }

    #[test]
    fn file_is_required() {
        assert!(cli().try_get_matches_from(["dialogue", "import"]).is_err());
    }

    #[test]
    fn migrate_output_flag() {
        let matches = cli()
            .try_get_matches_from(["dialogue", "migrate", "old.json", "-o", "new.json"])
            .unwrap();
        let (_, args) = matches.subcommand().unwrap();
        assert_eq!(
            args.get_one::<PathBuf>("output"),
            Some(&PathBuf::from("new.json"))
        );
    }
}
