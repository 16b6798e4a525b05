use clap::{Parser, Subcommand};
use critique_core::{load_assessment_config, render_json, render_text, Assessor};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Parser)]
#[command(name = "critique")]
#[command(version, about = "Single-image quality scorer with natural-language reports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assess one image and print the quality report
    Assess {
        /// Input image file (JPEG, PNG, TIFF, or camera RAW)
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Threshold/weight config file
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Also write the JSON report (default: <input stem>_quality_report.json)
        #[arg(long, value_name = "FILE", num_args = 0..=1)]
        json: Option<Option<PathBuf>>,

        /// Enable verbose output showing per-metric statistics
        #[arg(long)]
        verbose: bool,
    },

    /// Assess multiple images in parallel with shared settings
    Batch {
        /// Input image files
        #[arg(value_name = "INPUTS")]
        inputs: Vec<PathBuf>,

        /// Threshold/weight config file
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Directory to write per-image JSON reports into
        #[arg(long, value_name = "DIR")]
        json_dir: Option<PathBuf>,

        /// Number of parallel threads
        #[arg(short = 'j', long, value_name = "N")]
        threads: Option<usize>,

        /// Enable verbose output
        #[arg(long)]
        verbose: bool,
    },

    /// List supported image and RAW file formats
    Formats,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Assess {
            input,
            config,
            json,
            verbose,
        } => cmd_assess(input, config, json, verbose),

        Commands::Batch {
            inputs,
            config,
            json_dir,
            threads,
            verbose,
        } => cmd_batch(inputs, config, json_dir, threads, verbose),

        Commands::Formats => cmd_formats(),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Load and validate configuration, reporting its source in verbose mode.
fn load_assessor(config_path: Option<&PathBuf>, verbose: bool) -> Result<Assessor, String> {
    critique_core::config::set_verbose(verbose);

    let handle =
        load_assessment_config(config_path.map(|p| p.as_path())).map_err(|e| e.to_string())?;

    if verbose {
        if let Some(source) = &handle.source {
            eprintln!("[critique] Loaded config from {}", source.display());
        } else {
            eprintln!("[critique] Using built-in thresholds and weights");
        }
        for warning in &handle.warnings {
            eprintln!("[critique] Config warning: {}", warning);
        }
    }

    Assessor::new(handle.config).map_err(|e| e.to_string())
}

fn cmd_assess(
    input: PathBuf,
    config: Option<PathBuf>,
    json: Option<Option<PathBuf>>,
    verbose: bool,
) -> Result<(), String> {
    let assessor = load_assessor(config.as_ref(), verbose)?;

    let report = assessor.assess_path(&input).map_err(|e| e.to_string())?;

    println!("{}", render_text(&report));

    if let Some(json_path) = json {
        let output_path = match json_path {
            Some(path) => path,
            None => default_json_path(&input),
        };
        let json_text = render_json(&report).map_err(|e| e.to_string())?;
        std::fs::write(&output_path, json_text)
            .map_err(|e| format!("Failed to write JSON report: {}", e))?;
        println!("Detailed results saved to: {}", output_path.display());
    }

    Ok(())
}

/// Report path next to the input: `<stem>_quality_report.json`.
fn default_json_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    input.with_file_name(format!("{}_quality_report.json", stem))
}

fn cmd_batch(
    inputs: Vec<PathBuf>,
    config: Option<PathBuf>,
    json_dir: Option<PathBuf>,
    threads: Option<usize>,
    verbose: bool,
) -> Result<(), String> {
    if inputs.is_empty() {
        return Err("No input files specified".to_string());
    }

    let assessor = load_assessor(config.as_ref(), verbose)?;

    // Configure thread pool if specified
    if let Some(num_threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .map_err(|e| format!("Failed to configure thread pool: {}", e))?;
        println!("Using {} threads for parallel processing", num_threads);
    }

    if let Some(dir) = &json_dir {
        if !dir.exists() {
            std::fs::create_dir_all(dir)
                .map_err(|e| format!("Failed to create JSON output directory: {}", e))?;
        }
    }

    println!("\nAssessing {} files in parallel...\n", inputs.len());

    // Progress tracking
    let processed_count = AtomicUsize::new(0);
    let total_files = inputs.len();

    let results: Vec<Result<(), String>> = inputs
        .par_iter()
        .map(|input| {
            let report = assessor.assess_path(input).map_err(|e| e.to_string())?;

            if let Some(dir) = &json_dir {
                let report_name = default_json_path(input);
                let file_name = report_name
                    .file_name()
                    .ok_or_else(|| format!("Invalid input file name: {}", input.display()))?;
                let json_text = render_json(&report).map_err(|e| e.to_string())?;
                std::fs::write(dir.join(file_name), json_text)
                    .map_err(|e| format!("Failed to write JSON report: {}", e))?;
            }

            let count = processed_count.fetch_add(1, Ordering::SeqCst) + 1;
            println!(
                "[{}/{}] {}: {} ({:.1}%)",
                count,
                total_files,
                input.display(),
                report.overall.tier,
                report.overall.score
            );

            Ok(())
        })
        .collect();

    // Summarize results
    let mut success_count = 0;
    let mut errors: Vec<(PathBuf, String)> = Vec::new();

    for (input, result) in inputs.iter().zip(results.iter()) {
        match result {
            Ok(_) => success_count += 1,
            Err(e) => errors.push((input.clone(), e.clone())),
        }
    }

    println!("\n========================================");
    println!("BATCH ASSESSMENT COMPLETE");
    println!("========================================");
    println!("  Successful: {}", success_count);
    println!("  Failed:     {}", errors.len());
    if let Some(dir) = &json_dir {
        println!("  JSON dir:   {}", dir.display());
    }

    if !errors.is_empty() {
        println!("\nErrors:");
        for (path, error) in &errors {
            println!("  {}: {}", path.display(), error);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(format!("{} files failed to assess", errors.len()))
    }
}

fn cmd_formats() -> Result<(), String> {
    println!("Standard formats:");
    for ext in critique_core::decoders::SUPPORTED_EXTENSIONS {
        println!("  .{}", ext);
    }

    println!("\nRAW formats (decoded via LibRaw):");
    for ext in critique_core::decoders::RAW_EXTENSIONS {
        println!("  .{}", ext);
    }

    Ok(())
}
