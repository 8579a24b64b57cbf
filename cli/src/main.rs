//! unpaper CLI - bilingual paper extraction tool

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use unpaper::{
    content_key, parse_batch, parse_file_with_options, ExtractionStats, JsonFormat,
    LanguageSelection, ParseOptions, RenderOptions,
};

#[derive(Parser)]
#[command(name = "unpaper")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Extract bilingual papers to JSON, Markdown, and text", long_about = None)]
struct Cli {
    /// Input HTML file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output directory
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert papers to all formats (JSON, Markdown, text)
    Convert {
        /// Input HTML files
        #[arg(value_name = "FILE", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
    },

    /// Export a paper as bilingual Markdown
    #[command(alias = "md")]
    Markdown {
        /// Input HTML file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Language(s) to emit
        #[arg(long, value_enum, default_value = "both")]
        lang: Lang,

        /// Prepend a table of contents
        #[arg(long)]
        toc: bool,

        /// Leave out the bibliography
        #[arg(long)]
        skip_references: bool,

        /// Maximum heading level (1-6)
        #[arg(long, default_value = "6")]
        max_heading: u8,
    },

    /// Export a paper as plain text
    Text {
        /// Input HTML file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Language(s) to emit
        #[arg(long, value_enum, default_value = "both")]
        lang: Lang,

        /// Leave out the bibliography
        #[arg(long)]
        skip_references: bool,
    },

    /// Export the parsed paper as JSON
    Json {
        /// Input HTML file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Fail instead of emitting the fallback paragraph
        #[arg(long)]
        strict: bool,
    },

    /// Show paper statistics
    Info {
        /// Input HTML file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Lang {
    /// Original text only
    En,
    /// Translation only
    Ko,
    /// Original followed by translation
    Both,
}

impl From<Lang> for LanguageSelection {
    fn from(lang: Lang) -> Self {
        match lang {
            Lang::En => LanguageSelection::Primary,
            Lang::Ko => LanguageSelection::Secondary,
            Lang::Both => LanguageSelection::Both,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Convert { inputs, output }) => cmd_convert(&inputs, output.as_deref()),
        Some(Commands::Markdown {
            input,
            output,
            lang,
            toc,
            skip_references,
            max_heading,
        }) => {
            let options = RenderOptions::new()
                .with_language(lang.into())
                .with_toc(toc)
                .with_skip_references(skip_references)
                .with_max_heading(max_heading);
            cmd_markdown(&input, output.as_deref(), &options)
        }
        Some(Commands::Text {
            input,
            output,
            lang,
            skip_references,
        }) => {
            let options = RenderOptions::new()
                .with_language(lang.into())
                .with_skip_references(skip_references);
            cmd_text(&input, output.as_deref(), &options)
        }
        Some(Commands::Json {
            input,
            output,
            compact,
            strict,
        }) => cmd_json(&input, output.as_deref(), compact, strict),
        Some(Commands::Info { input, json }) => cmd_info(&input, json),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: convert if input is provided
            if let Some(input) = cli.input {
                cmd_convert(&[input], cli.output.as_deref())
            } else {
                println!("{}", "Usage: unpaper <FILE> [OUTPUT]".yellow());
                println!("       unpaper --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_convert(inputs: &[PathBuf], output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let output_dir = output.map(|p| p.to_path_buf()).unwrap_or_else(|| {
        match inputs {
            [single] => {
                let stem = single.file_stem().unwrap_or_default().to_string_lossy();
                PathBuf::from(format!("{}_output", stem))
            }
            _ => PathBuf::from("unpaper_output"),
        }
    });
    fs::create_dir_all(&output_dir)?;

    let pb = ProgressBar::new(inputs.len() as u64 * 2);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    pb.set_message("Reading files...");
    let mut sources = Vec::with_capacity(inputs.len());
    for input in inputs {
        let bytes = fs::read(input)?;
        let raw = String::from_utf8_lossy(&bytes).into_owned();
        sources.push((raw, input.to_string_lossy().into_owned()));
        pb.inc(1);
    }

    pb.set_message("Parsing papers...");
    let papers = parse_batch(&sources);
    log::debug!("Parsed {} papers", papers.len());

    let render_options = RenderOptions::new();
    let mut written = Vec::with_capacity(inputs.len());
    let mut used_stems = HashSet::new();
    for ((input, paper), (raw, _)) in inputs.iter().zip(&papers).zip(&sources) {
        let base_stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| content_key(raw));
        let stem = unique_stem(&base_stem, &mut used_stems);
        if stem != base_stem {
            log::warn!("{} shares its name with an earlier input, writing {}.*", input.display(), stem);
        }
        pb.set_message(format!("Writing {}...", stem));

        let json = unpaper::render::to_json(paper, JsonFormat::Pretty)?;
        fs::write(output_dir.join(format!("{}.json", stem)), &json)?;

        let markdown = unpaper::render::to_markdown(paper, &render_options)?;
        fs::write(output_dir.join(format!("{}.md", stem)), &markdown)?;

        let text = unpaper::render::to_text(paper, &render_options)?;
        fs::write(output_dir.join(format!("{}.txt", stem)), &text)?;

        written.push((stem, paper.len()));
        pb.inc(1);
    }

    pb.finish_with_message("Done!");

    println!("\n{} {}", "Output directory:".green().bold(), output_dir.display());
    let last = written.len().saturating_sub(1);
    for (i, (stem, count)) in written.iter().enumerate() {
        let branch = if i == last { "└─" } else { "├─" };
        println!(
            "  {} {}.{{json,md,txt}} {}",
            branch.dimmed(),
            stem,
            format!("({} paragraphs)", count).dimmed()
        );
    }

    Ok(())
}

/// First of `stem`, `stem-2`, `stem-3`, ... not yet in `used`.
fn unique_stem(stem: &str, used: &mut HashSet<String>) -> String {
    let mut candidate = stem.to_string();
    let mut n = 2;
    while used.contains(&candidate) {
        candidate = format!("{}-{}", stem, n);
        n += 1;
    }
    used.insert(candidate.clone());
    candidate
}

fn cmd_markdown(
    input: &Path,
    output: Option<&Path>,
    render_options: &RenderOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let paper = unpaper::parse_file(input)?;
    let markdown = unpaper::render::to_markdown(&paper, render_options)?;
    write_output(output, &markdown)
}

fn cmd_text(
    input: &Path,
    output: Option<&Path>,
    render_options: &RenderOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let paper = unpaper::parse_file(input)?;
    let text = unpaper::render::to_text(&paper, render_options)?;
    write_output(output, &text)
}

fn cmd_json(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    strict: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = if strict {
        ParseOptions::new().strict()
    } else {
        ParseOptions::new().lenient()
    };
    let paper = parse_file_with_options(input, options)?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let json = unpaper::render::to_json(&paper, format)?;
    write_output(output, &json)
}

fn cmd_info(input: &Path, as_json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = fs::read(input)?;
    let raw = String::from_utf8_lossy(&bytes);
    let paper = unpaper::parse(&raw, &input.to_string_lossy());
    let stats = ExtractionStats::from_paper(&paper);

    if as_json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("{}", "Paper Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Format".bold(), unpaper::detect_source_format(&raw));
    println!("{}: {}", "Content key".bold(), content_key(&raw));
    if let Some(title) = paper.structure.toc.first() {
        println!("{}: {}", "First heading".bold(), title.text);
    }

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Paragraphs".bold(), stats.paragraph_count);
    println!("{}: {}", "Headings".bold(), stats.heading_count);
    println!("{}: {}", "Figures".bold(), stats.image_count);
    println!("{}: {}", "Tables".bold(), stats.table_count);
    println!("{}: {}", "Code blocks".bold(), stats.code_count);
    println!("{}: {}", "Sentences".bold(), stats.sentence_count);
    println!(
        "{}: {} ({:.0}%)",
        "Translated".bold(),
        stats.translated_count,
        stats.translation_coverage() * 100.0
    );
    println!(
        "{}: {} ({} resolved)",
        "Citations".bold(),
        stats.citation_count,
        stats.resolved_citation_count
    );
    println!("{}: {}", "References".bold(), stats.reference_count);

    Ok(())
}

fn write_output(output: Option<&Path>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn cmd_version() {
    println!("{} {}", "unpaper".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Bilingual paper extraction tool");
    println!();
    println!("Repository: {}", "https://github.com/iyulab/unpaper".dimmed());
    println!("License: MIT");
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Output Naming Tests ====================

    #[test]
    fn test_unique_stem_suffixes_collisions() {
        let mut used = HashSet::new();
        assert_eq!(unique_stem("index", &mut used), "index");
        assert_eq!(unique_stem("index", &mut used), "index-2");
        assert_eq!(unique_stem("paper", &mut used), "paper");
        assert_eq!(unique_stem("index", &mut used), "index-3");
    }

    #[test]
    fn test_unique_stem_skips_taken_suffix() {
        let mut used = HashSet::new();
        assert_eq!(unique_stem("index-2", &mut used), "index-2");
        assert_eq!(unique_stem("index", &mut used), "index");
        assert_eq!(unique_stem("index", &mut used), "index-3");
    }
}
