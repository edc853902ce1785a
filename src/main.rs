//! Websum CLI - website and text summarisation front end
//!
//! The application logic is contained in lib.rs, and this file is responsible
//! for parsing arguments and handling top-level errors.

use clap::{CommandFactory, Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use websum::config::{Config, ConfigError};
use websum::display::HEADING;
use websum::shell::{current_year, PageShell};
use websum::{logging, ui, SummaryClient, SummaryForm, SummaryLength, SummaryRequest, SummaryStyle};

#[derive(Parser)]
#[command(name = "websum")]
#[command(author, version, about = "Summarise a webpage or a block of text", long_about = None)]
struct Cli {
    /// Path to a config file (defaults to websum.toml in cwd or ~/.config/websum)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarise a webpage by URL, or a block of text
    Summarise {
        /// URL to summarise
        #[arg(long, conflicts_with = "text")]
        url: Option<String>,
        /// Text to summarise
        #[arg(long)]
        text: Option<String>,
        /// short, medium or long
        #[arg(long)]
        length: Option<SummaryLength>,
        /// single_paragraph, bullet_points or detailed
        #[arg(long)]
        style: Option<SummaryStyle>,
        /// Print the sanitized HTML page instead of terminal text
        #[arg(long)]
        html: bool,
    },
    /// Print a shell completion script
    Completions {
        shell: clap_complete::Shell,
    },
    /// Print the JSON schema of the summarise request body
    Schema,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Summarise {
            url,
            text,
            length,
            style,
            html,
        }) => {
            let config = load_config(cli.config.as_deref())?;
            logging::init_stderr(&config.log.level);

            let mut form = SummaryForm::from_defaults(&config.defaults);
            if let Some(length) = length {
                form.set_length(length);
            }
            if let Some(style) = style {
                form.set_style(style);
            }
            form.set_url(url.unwrap_or_default());
            form.set_text(text.unwrap_or_default());

            let client = SummaryClient::new(&config.endpoint)?;
            let mut shell = PageShell::new(form);

            if !html {
                println!("Summarising via {}...\n", client.url());
            }
            shell.submit(&client).await;

            match summary_output(&shell, html) {
                Ok(output) => print!("{}", output),
                Err(error) => {
                    eprintln!("{}", error.red());
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        Some(Commands::Completions { shell }) => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "websum", &mut std::io::stdout());
        }
        Some(Commands::Schema) => {
            let schema = schemars::schema_for!(SummaryRequest);
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
        None => {
            // Default: Launch the TUI
            let config = load_config(cli.config.as_deref())?;
            let _guard = logging::init_file(Config::log_dir(), &config.log.level)?;
            ui::run(&config).await?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// What `summarise` prints after a submission, or the form's error message
fn summary_output(shell: &PageShell, html: bool) -> Result<String, String> {
    if let Some(error) = shell.form.error() {
        return Err(error.to_string());
    }
    if html {
        return Ok(shell.render_page(current_year()));
    }
    Ok(shell
        .display()
        .map(|display| format!("{}\n{}\n", HEADING.bold(), display.plain_text()))
        .unwrap_or_default())
}

fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}
