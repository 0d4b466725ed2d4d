use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use paletto::cli::{Args, Command};
use paletto::export::from_json;
use paletto::preview;
use paletto::scheme::derive_scheme_hex;
use paletto::session::Session;
use paletto::storage::{default_state_path, JsonFileStore};
use paletto::tui::{self, TuiApp};

fn init_logging() {
    let filter = EnvFilter::try_from_env("PALETTO_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_palette(session: &Session<JsonFileStore>, plain: bool) -> Result<()> {
    let mut out = std::io::stdout().lock();
    if plain {
        preview::write_plain(&mut out, session.palette())?;
    } else {
        preview::write_palette(&mut out, session.palette())?;
    }
    out.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging();

    let command = args.command.clone().unwrap_or(Command::Show);

    // Schemes are derived from the argument alone, no state needed.
    if let Command::Scheme { hex, kind } = &command {
        let scheme = derive_scheme_hex(hex, *kind)?;
        let mut out = std::io::stdout().lock();
        preview::write_scheme(&mut out, &scheme, args.plain)?;
        return Ok(());
    }

    let state_path = args.state.clone().unwrap_or_else(default_state_path);
    let store = JsonFileStore::open(&state_path);
    let mut session = match args.seed {
        Some(seed) => Session::load_with_rng(store, args.slots, StdRng::seed_from_u64(seed)),
        None => Session::load(store, args.slots),
    };

    match command {
        Command::Show | Command::Scheme { .. } => {}
        Command::Generate => {
            if !session.regenerate() {
                eprintln!("every slot is locked, palette unchanged");
            }
        }
        Command::Lock { id } => {
            let locked = session.toggle_lock(id)?;
            eprintln!("slot {id} {}", if locked { "locked" } else { "unlocked" });
        }
        Command::Set { id, hex } => {
            session.set_hex(id, &hex)?;
        }
        Command::Export {
            format,
            output,
            width,
            height,
        } => {
            let exporter = format.exporter(width, height);
            let path = output.unwrap_or_else(|| PathBuf::from(exporter.file_name()));
            exporter.write_to(session.palette(), &path)?;
            session.save()?;
            println!("{}", path.display());
            return Ok(());
        }
        Command::Import { file } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read palette file: {}", file.display()))?;
            let palette = from_json(&text)
                .with_context(|| format!("failed to import palette from {}", file.display()))?;
            session.replace(palette);
        }
        Command::Tui => {
            let export_dir =
                std::env::current_dir().context("failed to resolve working directory")?;
            return tui::run(TuiApp::new(session, export_dir));
        }
    }

    session.save()?;
    print_palette(&session, args.plain)
}
