use anyhow::{anyhow, Context};
use clap::{value_parser, Arg, ArgAction, Command};
use duka_core::DukaConfig;
use duka_directory::StoreStub;
use duka_inventory::{GeminiClient, InventoryGenerator};
use duka_model::StoreId;
use std::path::PathBuf;
use std::sync::Arc;

fn cli() -> Command {
    Command::new("duka")
        .version(duka_server::VERSION)
        .about("Nairobi Duka directory: street, building, duka, catalogue")
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines"),
        )
        .subcommand(
            Command::new("serve")
                .about("Run the HTTP server")
                .arg(
                    Arg::new("port")
                        .long("port")
                        .value_parser(value_parser!(u16))
                        .help("Listen port (overrides config and DUKA_PORT)"),
                ),
        )
        .subcommand(
            Command::new("generate")
                .about("Generate one store's catalogue and print it as JSON")
                .arg(
                    Arg::new("store")
                        .long("store")
                        .required(true)
                        .help("Store id, e.g. s2"),
                )
                .arg(
                    Arg::new("strict")
                        .long("strict")
                        .action(ArgAction::SetTrue)
                        .help("Fail instead of printing the fallback catalogue"),
                ),
        )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();

    duka_server::init_tracing(matches.get_flag("log-json"));

    let path = matches.get_one::<PathBuf>("config");
    let config = DukaConfig::load(path.map(PathBuf::as_path)).context("loading configuration")?;

    match matches.subcommand() {
        Some(("serve", args)) => {
            let config = match args.get_one::<u16>("port") {
                Some(port) => config.with_port(*port),
                None => config,
            };
            duka_server::start_server(&config).await?;
        }
        Some(("generate", args)) => {
            let id = args
                .get_one::<String>("store")
                .ok_or_else(|| anyhow!("--store is required"))?;
            let store = StoreStub::default()
                .find(&StoreId::from(id.as_str()))
                .ok_or_else(|| anyhow!("unknown store: {id}"))?;

            let client = GeminiClient::from_config(&config.generator)?;
            let generator = InventoryGenerator::new(Arc::new(client));

            let products = if args.get_flag("strict") {
                generator.try_generate(&store).await?
            } else {
                generator.generate(&store).await
            };
            println!("{}", serde_json::to_string_pretty(&products)?);
        }
        _ => {
            cli().print_help()?;
        }
    }

    Ok(())
}
