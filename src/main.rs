//! # Wristband CLI
//!
//! Command-line interface for composing patient wristbands.
//!
//! ## Usage
//!
//! ```bash
//! # Write a CSV template with two sample patients
//! wristband template --example patients.csv
//!
//! # Compose one PNG per patient into ./out
//! wristband render patients.csv --out out
//!
//! # One stacked sheet, auto-fit on, with a logo
//! wristband render patients.csv --out out --stacked --auto-fit --logo logo.png
//!
//! # One multi-page PDF, with DejaVu as the fallback font
//! wristband render patients.csv --out out --pdf --stacked \
//!     --default-font /usr/share/fonts/truetype/dejavu/DejaVuSans.ttf
//!
//! # List system font families
//! wristband fonts
//! ```
//!
//! Font options default to the saved preferences (`~/.wristband_prefs.json`);
//! `--save-prefs` stores the options of this run. Set `RUST_LOG` for more
//! detail, e.g. `RUST_LOG=wristband=debug`.

use clap::{Parser, Subcommand};
use std::fs::File;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use wristband::{
    ComposeOptions, Compositor, Geometry, OverflowPolicy, SearchStrategy, WristbandError,
    export,
    font::{BUILTIN_SIZE, DefaultFontSet, FontCatalog},
    layout::MIN_FONT_SIZE,
    logo,
    prefs::Preferences,
    record,
};

/// Wristband - patient wristband label composer
#[derive(Parser, Debug)]
#[command(name = "wristband")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compose bands from a CSV file and save them as PNG
    Render {
        /// CSV file with one patient per row
        input: PathBuf,

        /// Output directory
        #[arg(long, default_value = ".")]
        out: PathBuf,

        /// Save one stacked sheet instead of one file per band
        #[arg(long)]
        stacked: bool,

        /// Save PDF instead of PNG; with --stacked, one page per band
        #[arg(long)]
        pdf: bool,

        /// Logo image for the non-printable area
        #[arg(long, value_name = "FILE")]
        logo: Option<PathBuf>,

        /// Font family (see `wristband fonts`)
        #[arg(long)]
        family: Option<String>,

        /// Regular text size in pixels
        #[arg(long)]
        size: Option<u32>,

        /// Patient name size in pixels
        #[arg(long)]
        name_size: Option<u32>,

        /// Use the bold style for all text
        #[arg(long, num_args = 0..=1, default_missing_value = "true")]
        bold: Option<bool>,

        /// Use the italic style
        #[arg(long, num_args = 0..=1, default_missing_value = "true")]
        italic: Option<bool>,

        /// Shrink text until every field fits
        #[arg(long, num_args = 0..=1, default_missing_value = "true")]
        auto_fit: Option<bool>,

        /// Smallest size auto-fit will try
        #[arg(long, default_value_t = MIN_FONT_SIZE)]
        min_size: u32,

        /// Binary search instead of stepping down one size at a time
        #[arg(long)]
        bisect: bool,

        /// Fail instead of dropping fields that do not fit
        #[arg(long)]
        reject_overflow: bool,

        /// Printer resolution
        #[arg(
            long,
            default_value_t = wristband::geometry::DPI,
            value_parser = clap::value_parser!(u32).range(1..)
        )]
        dpi: u32,

        /// Font file used when nothing fits at the minimum size
        #[arg(long, value_name = "FILE")]
        default_font: Option<PathBuf>,

        /// Bold companion of --default-font
        #[arg(long, value_name = "FILE", requires = "default_font")]
        default_font_bold: Option<PathBuf>,

        /// Preferences file
        #[arg(long, value_name = "FILE")]
        prefs: Option<PathBuf>,

        /// Store the font options of this run as preferences
        #[arg(long)]
        save_prefs: bool,
    },

    /// Write a CSV template
    Template {
        /// Output CSV file
        output: PathBuf,

        /// Include two sample patients
        #[arg(long)]
        example: bool,
    },

    /// List font families found on this system
    Fonts,
}

fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("wristband=info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), WristbandError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            input,
            out,
            stacked,
            pdf,
            logo: logo_path,
            family,
            size,
            name_size,
            bold,
            italic,
            auto_fit,
            min_size,
            bisect,
            reject_overflow,
            dpi,
            default_font,
            default_font_bold,
            prefs,
            save_prefs,
        } => {
            let prefs_path = prefs.unwrap_or_else(Preferences::default_path);
            let mut prefs = Preferences::load(&prefs_path);

            // Flags override saved preferences
            if let Some(family) = family {
                prefs.font_family = family;
            }
            if let Some(size) = size {
                prefs.font_size = size;
            }
            if let Some(name_size) = name_size {
                prefs.name_font_size = name_size;
            }
            if let Some(bold) = bold {
                prefs.font_bold_flag = bold;
            }
            if let Some(italic) = italic {
                prefs.font_italic_flag = italic;
            }
            if let Some(auto_fit) = auto_fit {
                prefs.auto_fit_enabled = auto_fit;
            }
            if save_prefs {
                prefs.save(&prefs_path)?;
                println!("Saved preferences to {}", prefs_path.display());
            }

            let records = record::read_csv(File::open(&input)?)?;
            if records.is_empty() {
                return Err(WristbandError::Csv(format!(
                    "no patients in {}",
                    input.display()
                )));
            }

            let catalog = FontCatalog::discover();
            let fonts = prefs.selection().to_source(&catalog);
            let logo = logo_path.as_deref().and_then(logo::load);

            let defaults = match &default_font {
                Some(regular) => {
                    DefaultFontSet::load(regular, default_font_bold.as_deref(), BUILTIN_SIZE)
                }
                None => DefaultFontSet::builtin(),
            };
            let options = ComposeOptions {
                strategy: if bisect {
                    SearchStrategy::Bisect
                } else {
                    SearchStrategy::Linear
                },
                min_size,
                overflow: if reject_overflow {
                    OverflowPolicy::Reject
                } else {
                    OverflowPolicy::Drop
                },
            };
            let compositor =
                Compositor::new(Geometry::resolve(dpi), &defaults).with_options(options);

            println!("Composing {} band(s)...", records.len());
            let items = export::compose_batch(&compositor, &records, &fonts, logo.as_ref());

            let mut failed = 0;
            for item in &items {
                match &item.band {
                    Ok(band) if band.report.outcome.dropped() > 0 => println!(
                        "  card {}: {} field(s) did not fit ({:?})",
                        item.card,
                        band.report.outcome.dropped(),
                        band.report.outcome
                    ),
                    Ok(_) => {}
                    Err(e) => {
                        failed += 1;
                        eprintln!("  card {}: {}", item.card, e);
                    }
                }
            }

            match (pdf, stacked) {
                (true, true) => {
                    let path = export::save_pdf_single(&out, &items, dpi)?;
                    println!("Saved to {}", path.display());
                }
                (true, false) => {
                    let written = export::save_pdf_each(&out, &items, dpi)?;
                    println!("Saved {} file(s) to {}", written.len(), out.display());
                }
                (false, true) => {
                    let path = export::save_stacked(&out, &items, dpi)?;
                    println!("Saved to {}", path.display());
                }
                (false, false) => {
                    let written = export::save_each(&out, &items, dpi)?;
                    println!("Saved {} file(s) to {}", written.len(), out.display());
                }
            }
            if failed > 0 {
                return Err(WristbandError::Image(format!(
                    "{} band(s) could not be composed",
                    failed
                )));
            }
        }

        Commands::Template { output, example } => {
            let file = File::create(&output)?;
            if example {
                record::write_example_csv(file)?;
            } else {
                record::write_empty_csv(file)?;
            }
            println!("Saved to {}", output.display());
        }

        Commands::Fonts => {
            let catalog = FontCatalog::discover();
            if catalog.is_empty() {
                println!("No system fonts found; the built-in font will be used.");
                return Ok(());
            }
            println!("Available font families:");
            for family in catalog.families() {
                let styles: Vec<&str> = catalog
                    .entries(family)
                    .iter()
                    .map(|e| e.style.as_str())
                    .collect();
                println!("  {} ({})", family, styles.join(", "));
            }
        }
    }

    Ok(())
}
