// FILE: crates/cli/src/main.rs

use anyhow::{Context, Result};
use clap::{Arg, Command};

mod commands;

fn build_cli() -> Command {
    Command::new("readstack")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Personal library tracker and REST API")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("PATH")
                .help("Path to the configuration file")
                .default_value("readstack.toml")
                .global(true),
        )
        .subcommand(Command::new("serve").about("Run the REST API server"))
        .subcommand(Command::new("init").about("Initialize the database and verify its integrity"))
        .subcommand(
            Command::new("list")
                .about("List books in the library")
                .arg(
                    Arg::new("status")
                        .short('s')
                        .long("status")
                        .value_name("STATUS")
                        .help("Show only books in this status")
                        .value_parser(["wishlist", "reading", "finished", "abandoned", "on_hold"]),
                ),
        )
        .subcommand(
            Command::new("add")
                .about("Add a new book to the library")
                .arg(Arg::new("title").required(true).value_name("TITLE").help("Book title"))
                .arg(Arg::new("pages").short('p').long("pages").value_name("COUNT").help("Total page count"))
                .arg(Arg::new("isbn").short('i').long("isbn").value_name("ISBN").help("ISBN-13 or ISBN-10")),
        )
        .subcommand(
            Command::new("progress")
                .about("Report reading progress for a book")
                .arg(Arg::new("id").required(true).value_name("BOOK_ID").help("Book ID (UUID)"))
                .arg(Arg::new("page").required(true).value_name("PAGE").help("Current page")),
        )
        .subcommand(
            Command::new("status")
                .about("Set a book's status directly")
                .arg(Arg::new("id").required(true).value_name("BOOK_ID").help("Book ID (UUID)"))
                .arg(
                    Arg::new("status")
                        .required(true)
                        .value_name("STATUS")
                        .value_parser(["wishlist", "reading", "finished", "abandoned", "on_hold"]),
                ),
        )
        .subcommand(Command::new("stats").about("Show dashboard statistics"))
        .subcommand(
            Command::new("export")
                .about("Export the library as JSON")
                .arg(Arg::new("output").short('o').long("output").value_name("FILE").help("Output file path").default_value("library_export.json")),
        )
        .subcommand(
            Command::new("lookup")
                .about("Search the external metadata provider")
                .arg(Arg::new("query").required(true).value_name("QUERY").help("Search query"))
                .arg(Arg::new("limit").short('n').long("limit").value_name("COUNT").help("Maximum results").default_value("5")),
        )
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let matches = build_cli().get_matches();

    let config_path = matches
        .get_one::<String>("config")
        .map(|s| s.as_str())
        .unwrap_or("readstack.toml");
    let config =
        readstack_config::Config::load(config_path).context("Failed to load configuration")?;

    match matches.subcommand() {
        Some(("serve", _)) => commands::serve(config).await,
        Some(("init", _)) => commands::init(config).await,
        Some(("list", sub_matches)) => commands::list_books(config, sub_matches).await,
        Some(("add", sub_matches)) => commands::add_book(config, sub_matches).await,
        Some(("progress", sub_matches)) => commands::report_progress(config, sub_matches).await,
        Some(("status", sub_matches)) => commands::set_status(config, sub_matches).await,
        Some(("stats", _)) => commands::show_stats(config).await,
        Some(("export", sub_matches)) => commands::export_library(config, sub_matches).await,
        Some(("lookup", sub_matches)) => commands::lookup(config, sub_matches).await,
        _ => {
            build_cli().print_help()?;
            Ok(())
        }
    }
}
