use clap::Parser;
use tracing_subscriber::EnvFilter;
use voice_form_fill::cli::commands::{
    FillSource, cmd_fill, cmd_index, cmd_parse, cmd_polish, cmd_profile, load_profile,
};
use voice_form_fill::cli::config::{
    Cli, Commands, load_config, resolve_ai_config, resolve_fill_options,
};

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("voice_form_fill={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = load_config(cli.config.as_deref());

    // Resolve AI settings: CLI > config > defaults
    let ai = resolve_ai_config(&config.ai, cli.ai.as_deref(), cli.ai_model.as_deref());

    match cli.command {
        Commands::Fill {
            html,
            url,
            json,
            transcript,
            threshold,
            format,
            trace,
        } => {
            let source = match (json.as_deref(), transcript.as_deref()) {
                (Some(path), _) => FillSource::Json(path),
                (None, Some(path)) => FillSource::Transcript(path),
                (None, None) => return Err("fill needs --json or --transcript".into()),
            };
            let options = resolve_fill_options(&config.matching, threshold);
            let trace = trace.or(config.trace.path.clone());
            let profile = load_profile(&config.profile)?;

            let report = cmd_fill(
                &html,
                url.as_deref(),
                source,
                options,
                &format,
                trace.as_deref(),
                profile,
                &ai,
            )?;
            if report.filled_count() == 0 && !report.entries.is_empty() {
                std::process::exit(1);
            }
        }
        Commands::Parse { input } => {
            cmd_parse(input.as_deref(), &ai)?;
        }
        Commands::Polish { input } => {
            cmd_polish(input.as_deref(), &ai)?;
        }
        Commands::Index { html } => {
            cmd_index(&html)?;
        }
        Commands::Profile => {
            let profile = load_profile(&config.profile)?;
            cmd_profile(profile.as_ref())?;
        }
    }

    Ok(())
}
