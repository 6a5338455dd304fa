use anyhow::{Context, Result, bail};
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use markdown_reveal_config::Config;
use markdown_reveal_engine::snapshot::{check_document, normalize};
use markdown_reveal_engine::{Document, RenderOutput, active_block_for, render_document};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{
    env,
    fs::File,
    io::stdout,
    path::{Path, PathBuf},
    process,
};

mod terminal;
mod view;

const USAGE: &str = "Usage:
  markdown-reveal dump <file>            print the parsed block/inline tree
  markdown-reveal render <file> [cursor] print styled output, revealing the block at the
                                         cursor (a character index)
  markdown-reveal view [file]            live-preview editor";

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    let config_path = Config::config_path();
    let config = match Config::load() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };

    let command = args.get(1).map(String::as_str);
    init_logging(command == Some("view"))?;
    log::info!("Config path: {}", config_path.display());

    match (command, &args[args.len().min(2)..]) {
        (Some("dump"), [file]) => dump(Path::new(file), &config),
        (Some("render"), [file]) => render(Path::new(file), None, &config),
        (Some("render"), [file, cursor]) => {
            let cursor = cursor
                .parse()
                .with_context(|| format!("invalid cursor '{cursor}'"))?;
            render(Path::new(file), Some(cursor), &config)
        }
        (Some("view"), [file]) => view(PathBuf::from(file), &config),
        (Some("view"), []) => match config.default_file.clone() {
            Some(file) => view(file, &config),
            None => {
                eprintln!("Error: No file provided and no default_file in config");
                eprintln!("{USAGE}");
                eprintln!("Or set default_file in {}", config_path.display());
                process::exit(1);
            }
        },
        _ => {
            eprintln!("{USAGE}");
            process::exit(1);
        }
    }
}

/// Log to stderr, or to a file while the terminal belongs to the editor.
fn init_logging(to_file: bool) -> Result<()> {
    let mut builder = env_logger::Builder::from_default_env();
    builder.filter_level(log::LevelFilter::Info);
    if to_file {
        let path = env::temp_dir().join("markdown-reveal.log");
        let file = File::create(&path)
            .with_context(|| format!("cannot create log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

fn read_document(path: &Path, config: &Config) -> Result<Document> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let doc = Document::parse_bytes(&bytes, config.extensions())
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(doc)
}

fn dump(path: &Path, config: &Config) -> Result<()> {
    let doc = read_document(path, config)?;
    print!("{}", normalize(&doc));
    if let Err(e) = check_document(&doc) {
        bail!("invariant violated: {e}");
    }
    Ok(())
}

fn render(path: &Path, cursor: Option<usize>, config: &Config) -> Result<()> {
    let doc = read_document(path, config)?;
    let active = active_block_for(&doc, cursor);
    log::info!("{} blocks, active block {active:?}", doc.blocks().len());
    let forest = render_document(&doc, active, &config.styles());
    print!("{}", terminal::ansi(&RenderOutput::Styled(&forest)));
    Ok(())
}

fn view(path: PathBuf, config: &Config) -> Result<()> {
    let text = if path.exists() {
        let bytes = std::fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
        String::from_utf8(bytes).with_context(|| format!("{} is not UTF-8", path.display()))?
    } else {
        String::new()
    };

    let mut app = view::App::new(
        path,
        text,
        config.engine_options(),
        config.extensions(),
        config.styles(),
    );

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = view::run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}
