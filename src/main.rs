use clap::{Parser, Subcommand};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use tintbox::config::{Config, OutputFormat};
use tintbox::engine::{Engine, Recompute};
use tintbox::filtering::{FilterKind, RasterBackend, Strength, load_raw};
use tintbox::output::{self, ApplyEvent};
use tintbox::store::DiskStore;

#[derive(Parser)]
#[command(name = "tintbox")]
#[command(about = "Apply classic photo filters from the command line")]
#[command(long_about = "\
Apply classic photo filters from the command line

Seven filters, one strength dial. The dial runs 0.0–1.0 and is stretched
onto each filter's native parameter range:

  intensity  0–1     (sepia-tone, unsharp-mask, vignette)
  radius     0–200   (gaussian-blur)
  scale      0–10    (crystallize, pixellate, edges)

A tintbox.toml can set the default filter, strength, and output format;
command-line flags override it. Output format is chosen by the output
file's extension (png, jpg, webp, tiff).

Run 'tintbox filters' to list the catalog, and 'tintbox params' to inspect
the concrete values a strength maps to.")]
#[command(version)]
struct Cli {
    /// Config file with session defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the filter catalog and the parameter each filter accepts
    Filters {
        /// Emit the catalog as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the concrete parameter values for a filter at a strength
    Params {
        /// Filter slug (e.g. sepia-tone, gaussian-blur)
        filter: FilterKind,

        /// Strength in 0.0–1.0 (defaults to the config's)
        #[arg(long, short, value_parser = parse_strength)]
        strength: Option<f32>,

        /// Emit the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Apply a filter to one or more images and save the results
    Apply {
        /// Input image files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Filter slug (defaults to the config's)
        #[arg(long, short)]
        filter: Option<FilterKind>,

        /// Strength in 0.0–1.0 (defaults to the config's)
        #[arg(long, short, value_parser = parse_strength)]
        strength: Option<f32>,

        /// Output file (single input only; extension picks the format)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Directory for derived output names (default: next to each input)
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
}

/// The CLI stands in for the slider: values outside the dial's range are
/// rejected here, and everything downstream may assume [0, 1].
fn parse_strength(raw: &str) -> Result<f32, String> {
    let value: f32 = raw.parse().map_err(|_| format!("{raw:?} is not a number"))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("strength must be within 0.0–1.0, got {value}"))
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = Config::load_optional(cli.config.as_deref())?;

    match cli.command {
        Command::Filters { json } => {
            let listing = output::catalog_listing();
            if json {
                println!("{}", serde_json::to_string_pretty(&listing)?);
            } else {
                output::print_catalog(&listing);
            }
        }
        Command::Params {
            filter,
            strength,
            json,
        } => {
            let strength = strength
                .map(Strength::new)
                .unwrap_or_else(|| config.default_strength());
            let report = output::parameter_report(filter, strength);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                output::print_parameter_report(&report);
            }
        }
        Command::Apply {
            inputs,
            filter,
            strength,
            output,
            output_dir,
        } => {
            let filter = filter.unwrap_or(config.defaults.filter);
            let strength = strength
                .map(Strength::new)
                .unwrap_or_else(|| config.default_strength());
            apply(&inputs, filter, strength, output, output_dir, config.output.format)?;
        }
    }

    Ok(())
}

fn apply(
    inputs: &[PathBuf],
    filter: FilterKind,
    strength: Strength,
    output: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    if output.is_some() && inputs.len() != 1 {
        return Err("--output works with exactly one input; use --output-dir for batches".into());
    }
    if let Some(dir) = &output_dir {
        std::fs::create_dir_all(dir)?;
    }

    let jobs: Vec<(PathBuf, PathBuf)> = inputs
        .iter()
        .map(|input| {
            let target = match &output {
                Some(path) => path.clone(),
                None => derived_output(input, filter, format, output_dir.as_deref()),
            };
            (input.clone(), target)
        })
        .collect();

    let backend = RasterBackend::new();

    // Workers report through a channel; one printer thread owns stdout.
    let (tx, rx) = mpsc::channel::<ApplyEvent>();
    let printer = std::thread::spawn(move || {
        let (mut saved, mut failed) = (0usize, 0usize);
        for event in rx {
            match event {
                ApplyEvent::Saved { .. } => saved += 1,
                ApplyEvent::Failed { .. } => failed += 1,
            }
            println!("{}", output::format_apply_event(&event));
        }
        (saved, failed)
    });

    jobs.par_iter().for_each_with(tx, |tx, (input, target)| {
        let event = match apply_one(&backend, filter, strength, input, target) {
            Ok(()) => ApplyEvent::Saved {
                input: input.clone(),
                output: target.clone(),
            },
            Err(error) => ApplyEvent::Failed {
                input: input.clone(),
                error: error.to_string(),
            },
        };
        let _ = tx.send(event);
    });

    let (saved, failed) = printer.join().unwrap();
    println!("{}", output::format_apply_summary(saved, failed));

    if failed > 0 {
        return Err(format!("{failed} input(s) failed").into());
    }
    Ok(())
}

/// Run one image through a full session: pick, set the look, save.
fn apply_one(
    backend: &RasterBackend,
    filter: FilterKind,
    strength: Strength,
    input: &Path,
    target: &Path,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let image = load_raw(input)?;

    let mut engine = Engine::new(backend);
    engine.select_filter(filter);
    engine.set_strength(strength);
    if let Recompute::Failed(error) = engine.select_image(image) {
        return Err(error.into());
    }

    let ticket = engine.save(&DiskStore::new(target))?;
    ticket.wait()?;
    Ok(())
}

/// `dawn.jpg` + gaussian-blur + png → `dawn-gaussian-blur.png`, placed in
/// `output_dir` or next to the input.
fn derived_output(
    input: &Path,
    filter: FilterKind,
    format: OutputFormat,
    output_dir: Option<&Path>,
) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "image".to_string());
    let name = format!("{stem}-{}.{}", filter.slug(), format.extension());
    match output_dir {
        Some(dir) => dir.join(name),
        None => input.with_file_name(name),
    }
}
