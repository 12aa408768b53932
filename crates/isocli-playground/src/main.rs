mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use isocli::{CommandLineArguments, Dispatch, TemplateConfig, with_template};
use tracing_subscriber::{EnvFilter, fmt};

/// Path to a JSON template config that restyles every argument name.
const TEMPLATE_ENV: &str = "ISOCLI_TEMPLATE";

fn main() -> Result<()> {
    init_tracing();

    let cli = match std::env::var_os(TEMPLATE_ENV) {
        Some(path) => {
            let path = PathBuf::from(path);
            let config = TemplateConfig::load(&path)
                .with_context(|| format!("failed to load {TEMPLATE_ENV}={}", path.display()))?;
            tracing::debug!(path = %path.display(), "using template config");
            with_template(config, commands::cli)
        }
        None => commands::cli(),
    };

    let args = CommandLineArguments::from_env();
    if args.is_empty() {
        println!("{}", cli.help());
        return Ok(());
    }

    match cli.dispatch(args.clone()) {
        Dispatch::Help(text) if text.is_empty() => {
            bail!("no command matches '{args}'")
        }
        Dispatch::Help(text) => println!("{text}"),
        Dispatch::Matched(command) => commands::execute(&cli, command)?,
        Dispatch::NoMatch => {
            eprintln!("{}", cli.help());
            bail!("unrecognized arguments: {args}")
        }
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
