//! Native entry point: replay an event script and export it as PNG.

#[cfg(feature = "native")]
mod cli {
    use clap::Parser;
    use sketchpad_app::{ReplayOptions, run_replay};
    use std::path::PathBuf;
    use std::process::ExitCode;

    #[derive(Debug, Parser)]
    #[command(
        name = "sketchpad",
        version,
        about = "Replay a SketchPad event script and export the drawing as PNG"
    )]
    struct Cli {
        /// JSON array of pad events.
        events: PathBuf,
        /// Output PNG file.
        output: PathBuf,
        /// Config file (defaults to the platform config directory).
        #[arg(long)]
        config: Option<PathBuf>,
        /// TrueType/OpenType font used to draw stickers.
        #[arg(long)]
        font: Option<PathBuf>,
        /// Export side length in pixels.
        #[arg(long)]
        size: Option<u32>,
    }

    pub fn main() -> ExitCode {
        env_logger::init();
        let cli = Cli::parse();
        log::info!("Starting SketchPad replay");

        let options = ReplayOptions {
            events: cli.events,
            output: cli.output,
            config: cli.config,
            font: cli.font,
            size: cli.size,
        };
        match run_replay(&options) {
            Ok(summary) => {
                println!(
                    "{} events, {} drawables -> {} ({}x{}, {} bytes)",
                    summary.events,
                    summary.drawables,
                    options.output.display(),
                    summary.size,
                    summary.size,
                    summary.bytes
                );
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("error: {e}");
                ExitCode::FAILURE
            }
        }
    }
}

#[cfg(feature = "native")]
fn main() -> std::process::ExitCode {
    cli::main()
}

#[cfg(not(feature = "native"))]
fn main() -> std::process::ExitCode {
    eprintln!("Native feature not enabled. Use `cargo run --features native`");
    std::process::ExitCode::FAILURE
}
