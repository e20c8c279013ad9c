// gwreport entry point.
//
// Startup sequence:
// 1. Parse arguments
// 2. Initialize tracing (stderr; stdout carries the prompt)
// 3. Load config, applying command-line overrides
// 4. Run the selected command

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use gwreport_core::api::FplClient;
use gwreport_core::config::{self, Config, Overrides};
use gwreport_core::pipeline;
use gwreport_core::prompt::render_reports;
use gwreport_llm::client::LlmClient;
use gwreport_llm::output::save_report;

#[derive(Parser)]
#[command(name = "gwreport")]
#[command(about = "Gameweek match reports for an FPL head-to-head league")]
#[command(version)]
struct Cli {
    /// Directory holding config/ and defaults/
    #[arg(long, default_value = ".")]
    base_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the match reports and print the assembled prompt
    Report {
        /// League to report on (overrides league.league_id)
        #[arg(long)]
        league_id: Option<u64>,

        /// Gameweek to report on (overrides league.gameweek)
        #[arg(long)]
        gameweek: Option<u32>,

        /// Brutality level, 1 (mild) to 5 (savage)
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
        tone: Option<u8>,

        /// Bios JSON file (overrides bios.path)
        #[arg(long)]
        bios: Option<PathBuf>,

        /// Also print the match reports as JSON
        #[arg(long)]
        show_reports: bool,

        /// Send the prompt to the LLM and save the generated report
        #[arg(long)]
        generate: bool,
    },

    /// List the configured teams and league settings
    Teams {
        /// Bios JSON file (overrides bios.path)
        #[arg(long)]
        bios: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing()?;

    match cli.command {
        Commands::Report {
            league_id,
            gameweek,
            tone,
            bios,
            show_reports,
            generate,
        } => {
            let overrides = Overrides {
                league_id,
                gameweek,
                tone,
                bios_path: bios,
                enable_llm: generate,
            };
            let config = config::load_config(&cli.base_dir, &overrides)
                .context("failed to load configuration")?;
            run_report(&config, show_reports).await
        }
        Commands::Teams { bios } => {
            let overrides = Overrides {
                bios_path: bios,
                ..Overrides::default()
            };
            let config = config::load_config(&cli.base_dir, &overrides)
                .context("failed to load configuration")?;
            print_teams(&config);
            Ok(())
        }
    }
}

async fn run_report(config: &Config, show_reports: bool) -> anyhow::Result<()> {
    info!(
        league_id = config.league.league_id,
        gameweek = config.league.gameweek,
        tone = %config.tone,
        "generating gameweek summary"
    );

    let client = FplClient::from_config(&config.api).context("failed to build API client")?;
    let output = pipeline::run(&client, config)
        .await
        .context("failed to build gameweek reports")?;

    if show_reports {
        let json = render_reports(&output.reports).context("failed to render match reports")?;
        println!("{json}");
    }
    println!("{}", output.prompt);

    let llm = LlmClient::from_config(config);
    if llm.is_active() {
        let text = llm
            .generate(&output.prompt)
            .await
            .context("LLM generation failed")?;
        let today = chrono::Local::now().date_naive();
        let path = save_report(&text, &config.reports_dir(), output.gameweek, today)?;
        println!("Report saved to {}", path.display());
    }

    Ok(())
}

fn print_teams(config: &Config) {
    println!(
        "League {} | gameweek {} | Brutality Level: {}",
        config.league.league_id, config.league.gameweek, config.tone
    );
    println!("Bios: {}", config.bios_path.display());
    println!();

    if config.bios.is_empty() {
        println!("No teams configured.");
        return;
    }
    for (id, bio) in config.bios.iter() {
        println!(
            "{id:>8}  {:<28} {:<24} titles: {}",
            bio.team_name, bio.manager, bio.league_wins
        );
    }
}

/// Log to stderr so the prompt on stdout can be piped.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("gwreport=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
