//! CLI tool for generating one PowerPoint file per data row.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use slidemerge_core::DataTable;
use slidemerge_pptx::{extract_all_keys, extract_keys, MergeSession, TemplateArchive};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

/// Fill a PowerPoint template with rows from a CSV file.
#[derive(Parser, Debug)]
#[command(name = "slidemerge")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the {{placeholders}} found in a template
    Scan {
        /// Template file (.pptx)
        template: PathBuf,

        /// Scan every slide instead of only the first
        #[arg(long)]
        all_slides: bool,
    },

    /// Show the proposed placeholder-to-column mapping
    Map {
        /// Template file (.pptx)
        template: PathBuf,

        /// Data file (.csv)
        data: PathBuf,

        /// Field delimiter of the data file
        #[arg(short, long, default_value = ",", value_parser = parse_delimiter)]
        delimiter: u8,

        /// Print the mapping as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate one presentation per data row, bundled into a ZIP
    Generate {
        /// Template file (.pptx)
        template: PathBuf,

        /// Data file (.csv)
        data: PathBuf,

        /// Output ZIP path (default: <template>_generated.zip next to the template)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Field delimiter of the data file
        #[arg(short, long, default_value = ",", value_parser = parse_delimiter)]
        delimiter: u8,

        /// Map a placeholder to a column, overriding the automatic match
        #[arg(long = "map", value_name = "KEY=COLUMN", value_parser = parse_override)]
        overrides: Vec<(String, String)>,

        /// Leave a placeholder unmapped
        #[arg(long = "unmap", value_name = "KEY")]
        unmapped: Vec<String>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    match args.command {
        Command::Scan {
            template,
            all_slides,
        } => scan(&template, all_slides),
        Command::Map {
            template,
            data,
            delimiter,
            json,
        } => show_mapping(&template, &data, delimiter, json),
        Command::Generate {
            template,
            data,
            output,
            delimiter,
            overrides,
            unmapped,
        } => generate(
            &template,
            &data,
            output.as_ref(),
            delimiter,
            &overrides,
            &unmapped,
            args.verbose,
        ),
    }
}

/// Print the placeholders of a template.
fn scan(template: &Path, all_slides: bool) -> Result<()> {
    let bytes = read_input(template)?;
    let archive = TemplateArchive::open(&bytes)
        .with_context(|| format!("Failed to open template {}", template.display()))?;

    let keys = if all_slides {
        extract_all_keys(&archive)
    } else {
        extract_keys(&archive)
    };

    if keys.is_empty() {
        eprintln!("No placeholders found");
    }
    for key in keys {
        println!("{}", key);
    }

    Ok(())
}

/// Print the automatic mapping for a template and data file.
fn show_mapping(template: &Path, data: &Path, delimiter: u8, json: bool) -> Result<()> {
    let session = open_session(template, data, delimiter)?;

    if json {
        let out = serde_json::to_string_pretty(session.mapping())
            .context("Failed to serialize mapping")?;
        println!("{}", out);
        return Ok(());
    }

    for (key, column) in session.mapping().iter() {
        match column {
            Some(column) => println!("{{{{{}}}}} -> {}", key, column),
            None => println!("{{{{{}}}}} -> (unmapped)", key),
        }
    }

    Ok(())
}

/// Run the full batch and write the bundle.
fn generate(
    template: &Path,
    data: &Path,
    output: Option<&PathBuf>,
    delimiter: u8,
    overrides: &[(String, String)],
    unmapped: &[String],
    verbose: bool,
) -> Result<()> {
    let mut session = open_session(template, data, delimiter)?;

    if session.table().is_empty() {
        bail!("{} contains no data rows", data.display());
    }

    for (key, column) in overrides {
        if !session.columns().contains(column) {
            log::warn!("Column '{}' is not in {}", column, data.display());
        }
        session.set_mapping(key.as_str(), Some(column.clone()));
    }
    for key in unmapped {
        session.set_mapping(key.as_str(), None);
    }

    if verbose {
        let present: BTreeSet<&str> = session.placeholders().iter().map(String::as_str).collect();
        for (key, column) in session.mapping().iter() {
            if present.contains(key) {
                eprintln!("  {} -> {}", key, column.unwrap_or("(unmapped)"));
            }
        }
    }

    let bundle = session
        .run(|stats| eprintln!("Generated {}/{}", stats.completed, stats.total))
        .context("Generation failed, no output was written")?;

    let output_path = get_output_path(template, output)?;
    write_output(&output_path, &bundle)?;
    eprintln!(
        "Wrote {} presentations to {}",
        session.stats().completed,
        output_path.display()
    );

    Ok(())
}

/// Load both inputs and build a session.
fn open_session(template: &Path, data: &Path, delimiter: u8) -> Result<MergeSession> {
    let template_bytes = read_input(template)?;

    if !data.is_file() {
        bail!("Data file not found: {}", data.display());
    }
    let file =
        File::open(data).with_context(|| format!("Failed to open {}", data.display()))?;
    let table = DataTable::from_reader(BufReader::new(file), delimiter)
        .with_context(|| format!("Failed to parse {}", data.display()))?;

    log::debug!(
        "Loaded {} rows with columns {:?}",
        table.len(),
        table.columns()
    );

    Ok(MergeSession::new(template_bytes, table))
}

/// Read an input file, failing early when it is absent.
fn read_input(path: &Path) -> Result<Vec<u8>> {
    if !path.is_file() {
        bail!("Input file not found: {}", path.display());
    }
    std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Parse a single-byte delimiter.
fn parse_delimiter(s: &str) -> std::result::Result<u8, String> {
    let s = if s == "\\t" { "\t" } else { s };
    match s.as_bytes() {
        [b] if b.is_ascii() => Ok(*b),
        _ => Err(format!("delimiter must be a single ASCII character, got '{}'", s)),
    }
}

/// Parse a `KEY=COLUMN` override.
fn parse_override(s: &str) -> std::result::Result<(String, String), String> {
    let (key, column) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=COLUMN, got '{}'", s))?;

    let key = key.trim();
    if key.is_empty() {
        return Err("placeholder key must not be empty".to_string());
    }
    Ok((key.to_string(), column.trim().to_string()))
}

/// Determine the output path for the bundle.
fn get_output_path(template: &Path, output: Option<&PathBuf>) -> Result<PathBuf> {
    if let Some(path) = output {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
        return Ok(path.clone());
    }

    let stem = template
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    let filename = format!("{}_generated.zip", stem);

    Ok(match template.parent() {
        Some(parent) => parent.join(filename),
        None => PathBuf::from(filename),
    })
}

/// Write output to a file.
fn write_output(path: &Path, content: &[u8]) -> Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;

    file.write_all(content)
        .with_context(|| format!("Failed to write to {}", path.display()))?;

    Ok(())
}
