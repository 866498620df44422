use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::io::Write;
use std::path::{Path, PathBuf};
use wordpad_config::Config;
use wordpad_engine::editing::{Document, EditorOptions, SearchOptions};
use wordpad_engine::io::{load_document, read_plain_text, save_document, write_plain_text};

/// Inspect and convert wordpad documents from the command line
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file to use instead of ~/.config/wordpad/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the document's plain text
    Text { file: PathBuf },
    /// List headings with their level and line
    Outline { file: PathBuf },
    /// Print the table of contents built from headings
    Toc { file: PathBuf },
    /// Print word, character, line and paragraph counts
    Stats { file: PathBuf },
    /// Create a document from a plain text file
    Import { input: PathBuf, output: PathBuf },
    /// Write a document's text to a plain text file
    Export { input: PathBuf, output: PathBuf },
    /// Replace every match in a document and save it
    Replace {
        file: PathBuf,
        find: String,
        replacement: String,
        /// Treat the search text as a regular expression
        #[arg(long)]
        regex: bool,
        #[arg(long)]
        case_sensitive: bool,
        #[arg(long)]
        whole_word: bool,
    },
    /// List bookmarks with their offsets
    Bookmarks { file: PathBuf },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    let config = load_config(cli.config.as_deref())?;
    let stdout = std::io::stdout();
    run(cli.command, &config, &mut stdout.lock())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let loaded = match path {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };
    match loaded {
        Some(config) => Ok(config),
        None => {
            log::debug!("No config file found, using defaults");
            Ok(Config::default())
        }
    }
}

fn run(command: Command, config: &Config, out: &mut impl Write) -> Result<()> {
    let options = config.editor_defaults();
    let resolve = |path: &Path| config.resolve_document_path(path);

    match command {
        Command::Text { file } => {
            let doc = open(&resolve(&file), &options)?;
            writeln!(out, "{}", doc.text())?;
        }
        Command::Outline { file } => {
            let doc = open(&resolve(&file), &options)?;
            for entry in doc.outline() {
                writeln!(out, "{}\t{}\t{}", entry.level, entry.line + 1, entry.text)?;
            }
        }
        Command::Toc { file } => {
            let doc = open(&resolve(&file), &options)?;
            write!(out, "{}", doc.generate_table_of_contents())?;
        }
        Command::Stats { file } => {
            let stats = open(&resolve(&file), &options)?.statistics();
            writeln!(out, "words: {}", stats.words)?;
            writeln!(out, "characters: {}", stats.characters)?;
            writeln!(
                out,
                "characters (no spaces): {}",
                stats.characters_without_spaces
            )?;
            writeln!(out, "lines: {}", stats.lines)?;
            writeln!(out, "paragraphs: {}", stats.paragraphs)?;
        }
        Command::Import { input, output } => {
            let input = resolve(&input);
            let doc = read_plain_text(&input, &options)
                .with_context(|| format!("Failed to read {}", input.display()))?;
            let output = resolve(&output);
            save_document(&doc, &output)
                .with_context(|| format!("Failed to save {}", output.display()))?;
            log::info!("Imported {} into {}", input.display(), output.display());
        }
        Command::Export { input, output } => {
            let doc = open(&resolve(&input), &options)?;
            let output = resolve(&output);
            write_plain_text(&doc, &output)
                .with_context(|| format!("Failed to write {}", output.display()))?;
        }
        Command::Replace {
            file,
            find,
            replacement,
            regex,
            case_sensitive,
            whole_word,
        } => {
            let path = resolve(&file);
            let mut doc = open(&path, &options)?;
            let search = SearchOptions {
                case_sensitive,
                whole_word,
                regex,
            };
            let count = doc
                .replace_all(&find, &replacement, search)
                .with_context(|| format!("Invalid search pattern {find:?}"))?;
            if count > 0 {
                save_document(&doc, &path)
                    .with_context(|| format!("Failed to save {}", path.display()))?;
            }
            writeln!(out, "replaced {count}")?;
        }
        Command::Bookmarks { file } => {
            let doc = open(&resolve(&file), &options)?;
            for mark in &doc.annotations().bookmarks {
                writeln!(out, "{}\t{}", mark.offset, mark.name)?;
            }
        }
    }
    Ok(())
}

fn open(path: &Path, options: &EditorOptions) -> Result<Document> {
    let outcome = load_document(path, options)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    if outcome.used_fallback {
        log::warn!(
            "{} was not a readable document, loaded as plain text: {}",
            path.display(),
            outcome.diagnostic.as_deref().unwrap_or("unknown format")
        );
    }
    Ok(outcome.document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use wordpad_engine::editing::ParagraphStyle;

    fn run_to_string(command: Command, config: &Config) -> String {
        let mut out = Vec::new();
        run(command, config, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn saved_doc(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("letter.wpd");
        let mut doc = Document::from_text("Intro\nHello world\nDetails\nmore words");
        doc.set_paragraph_style(0, ParagraphStyle::Heading1);
        doc.set_paragraph_style(2, ParagraphStyle::Heading2);
        doc.add_bookmark("greeting", 6).unwrap();
        save_document(&doc, &path).unwrap();
        path
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_replace_flags() {
        let cli = Cli::try_parse_from([
            "wordpad", "-v", "replace", "a.wpd", "cat", "dog", "--regex",
        ])
        .unwrap();

        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Command::Replace {
                regex: true,
                case_sensitive: false,
                ..
            }
        ));
    }

    #[test]
    fn test_toc_and_outline_output() {
        let dir = TempDir::new().unwrap();
        let path = saved_doc(&dir);

        let toc = run_to_string(Command::Toc { file: path.clone() }, &Config::default());
        let outline = run_to_string(Command::Outline { file: path }, &Config::default());

        assert_eq!(toc, "Intro\n  Details\n");
        assert_eq!(outline, "1\t1\tIntro\n2\t3\tDetails\n");
    }

    #[test]
    fn test_relative_paths_use_documents_path() {
        // Given a config pointing at the temp dir
        let dir = TempDir::new().unwrap();
        saved_doc(&dir);
        let config = Config {
            documents_path: Some(dir.path().to_path_buf()),
            ..Config::default()
        };

        // When listing bookmarks by relative name
        let output = run_to_string(
            Command::Bookmarks {
                file: PathBuf::from("letter.wpd"),
            },
            &config,
        );

        // Then the document is found
        assert_eq!(output, "6\tgreeting\n");
    }

    #[test]
    fn test_replace_saves_document() {
        let dir = TempDir::new().unwrap();
        let path = saved_doc(&dir);

        let output = run_to_string(
            Command::Replace {
                file: path.clone(),
                find: "world|words".into(),
                replacement: "text".into(),
                regex: true,
                case_sensitive: false,
                whole_word: false,
            },
            &Config::default(),
        );

        assert_eq!(output, "replaced 2\n");
        let reloaded = load_document(&path, &EditorOptions::default()).unwrap();
        assert_eq!(
            reloaded.document.text(),
            "Intro\nHello text\nDetails\nmore text"
        );
    }

    #[test]
    fn test_import_then_export_round_trips_text() {
        let dir = TempDir::new().unwrap();
        let txt = dir.path().join("in.txt");
        let doc = dir.path().join("out.wpd");
        let exported = dir.path().join("back.txt");
        std::fs::write(&txt, "one\ntwo").unwrap();

        run_to_string(
            Command::Import {
                input: txt,
                output: doc.clone(),
            },
            &Config::default(),
        );
        run_to_string(
            Command::Export {
                input: doc,
                output: exported.clone(),
            },
            &Config::default(),
        );

        assert_eq!(std::fs::read_to_string(exported).unwrap(), "one\ntwo");
    }

    #[test]
    fn test_missing_config_path_gives_defaults() {
        let dir = TempDir::new().unwrap();

        let config = load_config(Some(&dir.path().join("absent.toml"))).unwrap();

        assert_eq!(config, Config::default());
    }
}
