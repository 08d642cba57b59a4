//! `callerid` command line: lookup, normalize and offline coercion

use anyhow::{Context, Result};
use callerid_lookup::{
    parse_payloads, CallerQuery, LookupConfig, LookupReport, Pipeline, RequestStyle, SchemaKind,
};
use callerid_phone::{normalize, normalize_with_confidence};
use clap::builder::BoolishValueParser;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("callerid")
        .version(callerid_lookup::VERSION)
        .about("Caller lookup against an upstream CRM or clinic system")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .env("CALLERID_CONFIG")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("endpoint")
                .long("endpoint")
                .env("CALLERID_ENDPOINT")
                .global(true)
                .help("Upstream lookup endpoint URL"),
        )
        .arg(
            Arg::new("token")
                .long("token")
                .env("CALLERID_TOKEN")
                .hide_env_values(true)
                .global(true)
                .help("Bearer credential or verification token"),
        )
        .arg(
            Arg::new("style")
                .long("style")
                .env("CALLERID_STYLE")
                .global(true)
                .value_parser(value_parser!(RequestStyle))
                .help("Request style: query or verification-token"),
        )
        .arg(
            Arg::new("token-header")
                .long("token-header")
                .env("CALLERID_TOKEN_HEADER")
                .global(true)
                .help("Header carrying the verification token"),
        )
        .arg(
            Arg::new("require-name")
                .long("require-name")
                .env("CALLERID_REQUIRE_NAME")
                .global(true)
                .action(ArgAction::SetTrue)
                .value_parser(BoolishValueParser::new())
                .help("Require first and last name on every lookup"),
        )
        .arg(
            Arg::new("default-country")
                .long("default-country")
                .env("CALLERID_DEFAULT_COUNTRY")
                .global(true)
                .help("Country prefix for 10-digit numbers"),
        )
        .arg(
            Arg::new("schema")
                .long("schema")
                .env("CALLERID_SCHEMA")
                .global(true)
                .value_parser(value_parser!(SchemaKind))
                .help("Alias table: retail, healthcare or custom"),
        )
        .arg(
            Arg::new("json-logs")
                .long("json-logs")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines on stderr"),
        )
        .subcommand(
            Command::new("lookup")
                .about("Look up a caller and print the report as JSON")
                .arg(
                    Arg::new("phone")
                        .long("phone")
                        .default_value("")
                        .help("Phone number, any format"),
                )
                .arg(Arg::new("first").long("first").help("Caller first name"))
                .arg(Arg::new("last").long("last").help("Caller last name"))
                .arg(
                    Arg::new("demo")
                        .long("demo")
                        .action(ArgAction::SetTrue)
                        .help("Serve the demo fixture instead of calling upstream"),
                ),
        )
        .subcommand(
            Command::new("normalize")
                .about("Normalize a phone number")
                .arg(Arg::new("raw").required(true).help("Phone number, any format"))
                .arg(
                    Arg::new("prefix")
                        .long("prefix")
                        .help("Country prefix (overrides configuration)"),
                ),
        )
        .subcommand(
            Command::new("coerce")
                .about("Coerce an upstream payload file offline")
                .arg(
                    Arg::new("payload")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("JSON payload (object or array)"),
                )
                .arg(
                    Arg::new("phone")
                        .long("phone")
                        .default_value("")
                        .help("Searched phone, excluded from alternate phones"),
                ),
        )
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

fn load_config(args: &ArgMatches) -> Result<LookupConfig> {
    let mut config = match args.get_one::<PathBuf>("config") {
        Some(path) => LookupConfig::from_file(path)?,
        None => LookupConfig::default(),
    };

    if let Some(endpoint) = args.get_one::<String>("endpoint") {
        config.endpoint = Some(endpoint.clone());
    }
    if let Some(token) = args.get_one::<String>("token") {
        config.token = Some(token.clone());
    }
    if let Some(style) = args.get_one::<RequestStyle>("style") {
        config.style = *style;
    }
    if let Some(header) = args.get_one::<String>("token-header") {
        config.token_header = header.clone();
    }
    if args.get_flag("require-name") {
        config.require_name = true;
    }
    if let Some(prefix) = args.get_one::<String>("default-country") {
        config.default_country_prefix = prefix.clone();
    }
    if let Some(schema) = args.get_one::<SchemaKind>("schema") {
        config.schema = *schema;
    }

    Ok(config)
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run_lookup(args: &ArgMatches) -> Result<bool> {
    let config = load_config(args)?;
    let text = |name: &str| args.get_one::<String>(name).cloned();

    let query = CallerQuery {
        phone: text("phone").unwrap_or_default(),
        first: text("first"),
        last: text("last"),
        demo: args.get_flag("demo"),
    };

    let report = match Pipeline::from_config(config) {
        Ok(pipeline) => pipeline.handle(&query).await,
        Err(err) => {
            tracing::error!("Lookup client unavailable: {}", err);
            LookupReport::from_error(&err)
        }
    };

    print_json(&report)?;
    Ok(!report.is_failure())
}

fn run_normalize(args: &ArgMatches) -> Result<()> {
    let config = load_config(args)?;
    let prefix = args
        .get_one::<String>("prefix")
        .map_or_else(|| config.country_prefix(), |p| callerid_phone::normalize_prefix(p));
    let raw = args.get_one::<String>("raw").map_or("", String::as_str);

    print_json(&normalize_with_confidence(raw, &prefix))
}

fn run_coerce(args: &ArgMatches) -> Result<()> {
    let config = load_config(args)?;
    let coercer = config.coercer()?;

    let path = args
        .get_one::<PathBuf>("payload")
        .context("payload path is required")?;
    let body = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read payload {}", path.display()))?;
    let payloads = parse_payloads(&body)?;

    let phone = args.get_one::<String>("phone").map_or("", String::as_str);
    let searched = normalize(phone, &config.country_prefix());
    let records: Vec<_> = payloads
        .iter()
        .map(|payload| coercer.coerce(payload, &searched))
        .collect();

    tracing::info!(records = records.len(), "Coerced payload file");
    print_json(&records)
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();
    let (name, args) = matches
        .subcommand()
        .context("a subcommand is required")?;

    init_tracing(args.get_flag("json-logs"));

    match name {
        "lookup" => {
            if !run_lookup(args).await? {
                std::process::exit(1);
            }
        }
        "normalize" => run_normalize(args)?,
        "coerce" => run_coerce(args)?,
        other => anyhow::bail!("unknown command: {other}"),
    }

    Ok(())
}
