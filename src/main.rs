use anyhow::{Context, Result as AnyhowResult};
use clap::Parser;
use crossterm::event::{read as event_read, Event as CrosstermEvent};
use gapedit::app::Editor;
use gapedit::config::Config;
use gapedit::services::diagnostics::FileDiagnostics;
use gapedit::services::terminal_modes::TerminalModes;
use gapedit::services::tracing_setup;
use std::io::{self, stdout, Write};
use std::path::PathBuf;

/// A small terminal text editor
#[derive(Parser, Debug)]
#[command(name = "gapedit")]
#[command(about = "A byte-oriented terminal text editor", long_about = None)]
#[command(version)]
struct Args {
    /// Files to open, one buffer each. Missing files start empty.
    #[arg(value_name = "FILES")]
    files: Vec<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Path to log file (logging is off without it)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    dump_config: bool,
}

fn load_config(args: &Args) -> AnyhowResult<Config> {
    match &args.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(Config::load_or_default(None)),
    }
}

fn run_event_loop<W: Write>(editor: &mut Editor, out: &mut W) -> AnyhowResult<()> {
    loop {
        editor.render(out)?;
        if editor.should_quit() {
            return Ok(());
        }
        match event_read()? {
            CrosstermEvent::Key(event) => editor.handle_event(&event),
            CrosstermEvent::Resize(width, height) => editor.resize(width, height),
            _ => {}
        }
    }
}

fn main() -> AnyhowResult<()> {
    let args = Args::parse();
    let config = load_config(&args)?;

    if args.dump_config {
        println!("{}", config.to_json()?);
        return Ok(());
    }

    if let Some(log_file) = &args.log_file {
        tracing_setup::init_global(log_file)?;
    }

    let diagnostics = FileDiagnostics::open(config.diagnostics.effective_path())?;
    let (width, height) = crossterm::terminal::size()?;
    let mut editor = Editor::new(config, width, height).with_diagnostics(Box::new(diagnostics));
    editor.open_initial_files(&args.files)?;

    let mut modes = TerminalModes::enable()?;
    let result = run_event_loop(&mut editor, &mut io::BufWriter::new(stdout()));
    modes.restore();

    if let Err(e) = &result {
        tracing::error!("Editor exited with error: {e:#}");
    }
    result
}
