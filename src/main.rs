use clap::{Parser, Subcommand};
use normal_z::imaging::{Quality, RustBackend};
use normal_z::process::{self, BatchOptions, Dispatch, Session};
use normal_z::reconstruct::ReconstructionMode;
use normal_z::{config, naming, output, scan};
use std::path::PathBuf;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "normal-z")]
#[command(about = "Reconstruct the blue (Z) channel of tangent-space normal maps")]
#[command(long_about = "\
Reconstruct the blue (Z) channel of tangent-space normal maps

Red and green are read as the normal's X and Y, blue is rebuilt from the
unit-length constraint, and the result is written as an RGB image. Alpha
is dropped.

One input is processed and saved (to --output, or beside the input as
<stem>_processed.png). Several inputs, or a directory, run as a batch into
--out-dir; a file that fails doesn't stop the others.

Modes:
  standard   z renormalized, stored as (z + 1) / 2   (flat = 255, edge-on = 127)
  alternate  sqrt(max(1 - x² - y², 0)), stored as-is (flat = 255, edge-on = 0)

Output format follows the extension: jpg/jpeg → JPEG, tga → TGA,
anything else → PNG.

Run 'normal-z gen-config' to generate a documented config file.")]
#[command(version = version_string())]
struct Cli {
    /// Config file (TOML); omitted values use defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Reconstruction formula (overrides config)
    #[arg(long, value_enum, global = true)]
    mode: Option<ReconstructionMode>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args)]
struct ProcessArgs {
    /// Input images or directories
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output file for a single input
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Output directory (required for batches)
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Output extension, selects the encoder (overrides config)
    #[arg(long)]
    ext: Option<String>,

    /// Suffix appended to each input stem (overrides config)
    #[arg(long)]
    suffix: Option<String>,

    /// JPEG quality 1-100 (overrides config)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=100))]
    quality: Option<u32>,

    /// Descend into subdirectories of directory inputs
    #[arg(long, short)]
    recursive: bool,

    /// Write a JSON report of a batch run
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Reconstruct one image, or a batch of images
    Process(ProcessArgs),
    /// Print a stock config file with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Process(args) => {
            let config = config::load_config(cli.config.as_deref())?.with_overrides(
                config::Overrides {
                    mode: cli.mode,
                    extension: args.ext,
                    suffix: args.suffix,
                    jpeg_quality: args.quality,
                },
            )?;
            let mode = config.mode;
            let extension = config.output.extension;
            let suffix = config.output.suffix;
            let quality = Quality::new(config.output.jpeg_quality);

            let inputs = scan::collect_inputs(&args.inputs, args.recursive, &suffix)?;
            let backend = RustBackend::new();

            match Dispatch::from_paths(&inputs)? {
                Dispatch::Single(input) => {
                    let mut session = Session::new();
                    let dimensions = session.process(&backend, &inputs, mode)?.dimensions();
                    let output_path = match (args.output, args.out_dir) {
                        (Some(path), _) => path,
                        (None, Some(dir)) => naming::output_path(input, &dir, &suffix, &extension),
                        (None, None) => naming::default_single_output(input, &suffix, &extension),
                    };
                    let format = session.save(&backend, &output_path, quality)?;
                    output::print_single_output(input, dimensions, mode, &output_path, format);
                }
                Dispatch::Batch(paths) => {
                    if args.output.is_some() {
                        return Err("--output takes a single input; use --out-dir for batches".into());
                    }
                    let out_dir = args.out_dir.ok_or("batch runs need --out-dir")?;
                    init_thread_pool(&config.processing);

                    let options = BatchOptions {
                        out_dir,
                        extension,
                        suffix,
                        mode,
                        quality,
                    };
                    let (tx, rx) = std::sync::mpsc::channel();
                    let printer = std::thread::spawn(move || {
                        for event in rx {
                            for line in output::format_batch_event(&event) {
                                println!("{}", line);
                            }
                        }
                    });
                    let report = process::run_batch(&backend, paths, &options, Some(tx))?;
                    printer
                        .join()
                        .map_err(|_| "progress printer panicked")?;

                    output::print_batch_summary(&report);
                    if let Some(report_path) = &args.report {
                        let json = serde_json::to_string_pretty(&report)?;
                        std::fs::write(report_path, json)?;
                    }
                    if report.failed() > 0 {
                        return Err(format!(
                            "{} of {} images failed",
                            report.failed(),
                            report.total
                        )
                        .into());
                    }
                }
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; config can lower it, not raise it.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
