use clap::Parser;
use qrscan::{Decoder, DecoderConfig, RasterImage, format_payloads};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "qrscan", version, about = "Decode QR codes in image files")]
struct Cli {
    /// Images to scan
    #[arg(required = true)]
    images: Vec<PathBuf>,
    /// Print per-candidate diagnostics to stderr
    #[arg(long)]
    report: bool,
    /// Give up on an image after this many milliseconds
    #[arg(long)]
    time_budget_ms: Option<u64>,
    /// Disable the Otsu retry pass
    #[arg(long)]
    no_otsu: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = DecoderConfig::from_env();
    if let Some(ms) = cli.time_budget_ms {
        config = config.with_time_budget(Duration::from_millis(ms));
    }
    if cli.no_otsu {
        config.otsu_fallback = false;
    }
    let decoder = Decoder::new(config);

    let multiple_files = cli.images.len() > 1;
    let mut found_any = false;
    for path in &cli.images {
        let img = match image::open(path) {
            Ok(img) => img,
            Err(err) => {
                eprintln!("{}: {}", path.display(), err);
                continue;
            }
        };
        let raster = RasterImage::from_dynamic(&img);

        let report = match decoder.decode_report(&raster) {
            Ok(report) => report,
            Err(err) => {
                eprintln!("{}: {}", path.display(), err);
                continue;
            }
        };

        if multiple_files {
            println!("== {}", path.display());
        }
        if report.symbols.is_empty() {
            eprintln!("{}: no QR code found", path.display());
        } else {
            found_any = true;
            println!("{}", format_payloads(&report.symbols));
        }

        if cli.report {
            eprintln!(
                "{}: {} finder patterns, {} candidates tried{}{}",
                path.display(),
                report.finder_patterns,
                report.candidates_tried,
                if report.used_otsu { ", otsu pass" } else { "" },
                if report.deadline_hit { ", time budget hit" } else { "" },
            );
            for symbol in &report.symbols {
                eprintln!(
                    "  decoded: version {} {:?} {:?}, {} corrected",
                    symbol.version.number(),
                    symbol.error_correction,
                    symbol.mask_pattern,
                    symbol.corrected_errors
                );
            }
            for outcome in report.failures() {
                if let Err(err) = &outcome.status {
                    let finders: Vec<String> = outcome
                        .finders
                        .iter()
                        .map(|p| format!("({:.1}, {:.1})", p.x, p.y))
                        .collect();
                    eprintln!(
                        "  {:?} [{}]: {}",
                        outcome.binarizer,
                        finders.join(" "),
                        err
                    );
                }
            }
        }
    }

    if found_any {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}
