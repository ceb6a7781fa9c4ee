use anyhow::{Context, Result, bail};
use blockmark_config::Config;
use blockmark_engine::{Document, MultiLineKind, io, locate_element_span, offsets};
use relative_path::RelativePathBuf;
use std::path::{Path, PathBuf};
use std::{env, process};

mod script;

const USAGE: &str = "Usage: blockmark <command> <file.md> [args]

Commands:
  blocks <file>                 print the reconciled blocks
  serialize <file>              print the reconciled markdown
  html <file>                   print the document as an HTML page
  locate <file> <kind>          print the byte span of the first <kind> block, or -1 -1
  replay <file> <script> [--write]
                                apply an editing script and print the result";

enum Command {
    Blocks,
    Serialize,
    Html,
    Locate(MultiLineKind),
    Replay { script: PathBuf, write: bool },
}

/// A markdown file split into its directory and a path relative to it.
struct Target {
    root: PathBuf,
    file: RelativePathBuf,
}

impl Target {
    fn new(path: &Path) -> Result<Self> {
        let file = path
            .file_name()
            .with_context(|| format!("'{}' is not a file path", path.display()))?;
        let root = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        Ok(Self {
            root,
            file: RelativePathBuf::from(file.to_string_lossy().as_ref()),
        })
    }
}

fn parse_args(args: &[String]) -> Result<(Command, Target)> {
    let [command, file, rest @ ..] = args else {
        bail!("missing command or file");
    };
    let target = Target::new(Path::new(file))?;
    let command = match (command.as_str(), rest) {
        ("blocks", []) => Command::Blocks,
        ("serialize", []) => Command::Serialize,
        ("html", []) => Command::Html,
        ("locate", [kind]) => Command::Locate(kind.parse()?),
        ("replay", [script]) => Command::Replay {
            script: PathBuf::from(script),
            write: false,
        },
        ("replay", [script, flag]) if flag == "--write" => Command::Replay {
            script: PathBuf::from(script),
            write: true,
        },
        (other, _) => bail!("unknown command or arguments: {other}"),
    };
    Ok((command, target))
}

fn run(command: Command, target: &Target, config: &Config) -> Result<()> {
    let parser = config.parser();
    let mut doc = io::open_document(&target.file, &target.root, &parser, config.editor.clone())
        .with_context(|| format!("opening {}", target.file))?;

    match command {
        Command::Blocks => {
            for (index, block) in doc.blocks().enumerate() {
                println!("{index:>4}  {block}");
            }
        }
        Command::Serialize => println!("{}", doc.serialize()),
        Command::Html => println!("{}", config.renderer().render_page(&doc.serialize())),
        Command::Locate(kind) => {
            let markdown = io::read_file(&target.file, &target.root)?;
            let span = locate_element_span(&markdown, &parser, |b| b.kind() == Some(kind));
            let (start, end) = offsets(span);
            println!("{start} {end}");
        }
        Command::Replay { script, write } => {
            let text = std::fs::read_to_string(&script)
                .with_context(|| format!("reading script {}", script.display()))?;
            let steps = script::parse(&text)?;
            let count = steps.len();
            replay_and_settle(&mut doc, steps)?;
            log::info!("replayed {count} step(s)");

            if write {
                io::save_document(&doc, &target.file, &target.root)?;
                log::info!("wrote {}", target.file);
            }
            println!("{}", doc.serialize());
        }
    }
    Ok(())
}

/// Replays `steps`, then reconciles the block left focused so the output is
/// canonical.
fn replay_and_settle(doc: &mut Document, steps: Vec<script::Step>) -> Result<()> {
    script::replay(doc, steps)?;
    if let Some(index) = doc.focus() {
        doc.manage_block(index)?;
    }
    Ok(())
}

fn main() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let (command, target) = match parse_args(&args) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("{USAGE}");
            process::exit(2);
        }
    };

    let config = match Config::load_or_default() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            eprintln!("Fix or remove {}", Config::config_path().display());
            process::exit(1);
        }
    };
    log::debug!("config: {config:?}");

    if let Err(e) = run(command, &target, &config) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
