use autofill_observer::cli::commands::{cmd_extract, cmd_run};
use autofill_observer::cli::config::{Cli, Commands, build_run_options, load_config, log_filter};
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // RUST_LOG wins over -v
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_filter(cli.verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(cli.config.as_deref());

    // Resolve sink endpoint: CLI > config
    let sink_endpoint = cli
        .sink_endpoint
        .as_deref()
        .or(config.sink.endpoint.as_deref());

    match cli.command {
        Commands::Run {
            scenario,
            format,
            output,
            scan,
        } => {
            let options = build_run_options(&config, scan, cli.trace.as_deref());
            let all_passed = cmd_run(
                &scenario,
                &format,
                output.as_deref(),
                options,
                sink_endpoint,
                config.sink.timeout_secs,
            )?;
            if !all_passed {
                std::process::exit(1);
            }
        }
        Commands::Extract { form } => {
            cmd_extract(&form)?;
        }
    }

    Ok(())
}
