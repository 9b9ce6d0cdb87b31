//! Headless session replay: event script in, PNG out.

use crate::error::{AppError, AppResult};
use sketchpad_core::{Canvas, PadConfig, PadEvent};
use sketchpad_render::{PngExporter, load_font};
use std::fs;
use std::path::{Path, PathBuf};

/// Inputs of a replay run.
#[derive(Debug, Clone, Default)]
pub struct ReplayOptions {
    /// JSON array of [`PadEvent`]s.
    pub events: PathBuf,
    /// Where the PNG is written.
    pub output: PathBuf,
    /// Config file; the platform default location is tried when absent.
    pub config: Option<PathBuf>,
    /// Font used to rasterize stamps.
    pub font: Option<PathBuf>,
    /// Export side length; defaults to the configured export size.
    pub size: Option<u32>,
}

/// What a replay run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaySummary {
    pub events: usize,
    pub changed: usize,
    pub drawables: usize,
    pub size: u32,
    pub bytes: usize,
}

fn read(path: &Path) -> AppResult<Vec<u8>> {
    fs::read(path).map_err(|source| AppError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn load_config(path: Option<&Path>) -> AppResult<PadConfig> {
    let config = match path {
        Some(path) => PadConfig::load(path)?,
        None => PadConfig::load_or_default()?,
    };
    Ok(config)
}

/// Parse a script and reject tools that would not pass the palette checks.
pub fn load_script(path: &Path) -> AppResult<Vec<PadEvent>> {
    let json = fs::read_to_string(path).map_err(|source| AppError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let script = PadEvent::script_from_json(&json)?;
    for event in &script {
        if let PadEvent::SelectTool { tool } = event {
            tool.validate()?;
        }
    }
    Ok(script)
}

/// Replay the script into a fresh canvas and export it.
pub fn run(options: &ReplayOptions) -> AppResult<ReplaySummary> {
    let config = load_config(options.config.as_deref())?;
    let size = options.size.unwrap_or(config.export_size);
    if size == 0 {
        return Err(AppError::Usage("export size must be positive".to_string()));
    }

    let script = load_script(&options.events)?;
    let events = script.len();

    let mut exporter = PngExporter::new();
    if let Some(path) = &options.font {
        exporter = exporter.with_font(load_font(read(path)?)?);
    } else {
        log::warn!("No font given, stamps will be left out of the export");
    }

    let mut canvas = Canvas::new(config);
    let changed = canvas.replay(script);
    log::debug!("Replayed {} events, {} changed the canvas", events, changed);

    let bytes = canvas.export(&mut exporter, size)?;
    fs::write(&options.output, &bytes).map_err(|source| AppError::Write {
        path: options.output.clone(),
        source,
    })?;
    log::info!(
        "Wrote {} ({}x{}, {} bytes)",
        options.output.display(),
        size,
        size,
        bytes.len()
    );

    Ok(ReplaySummary {
        events,
        changed,
        drawables: canvas.document().len(),
        size,
        bytes: bytes.len(),
    })
}
