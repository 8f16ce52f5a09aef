mod cli;

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use spriterig_assets::{inline_svg_folder, patch_texture_sizes, strip_shape_definitions_file, ShapeAssetResolver};
use spriterig_core::{build_catalog, load_tag_stream, CatalogReport, ResultSerializer, RigConfig};

use cli::{Args, Command};

fn init_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();
}

fn load_config(args: &Args) -> Result<RigConfig> {
    let mut cfg = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("failed to parse config {}", path.display()))?
        }
        None => RigConfig::default(),
    };
    if let Some(scale) = args.scale {
        cfg.global_scale_factor = scale;
    }
    if let Command::Models {
        master_sprite,
        root_timeline,
        ..
    } = &args.command
    {
        if let Some(id) = master_sprite {
            cfg.master_sprite_id = Some(id.clone());
        }
        if *root_timeline {
            cfg.master_sprite_id = None;
        }
    }
    cfg.validate().map_err(anyhow::Error::msg).context("invalid configuration")?;
    Ok(cfg)
}

fn log_report(report: &CatalogReport) {
    info!(
        "{} master frames, {} duplicate model references, {} moves at unknown depths, {} status overlays excluded",
        report.master_frames,
        report.duplicates.len(),
        report.dropped_moves,
        report.excluded_overlays
    );
    if report.shapeless_components > 0 || report.shadowed_depths > 0 {
        info!(
            "{} components without a sprite definition, {} layout depths placed twice",
            report.shapeless_components, report.shadowed_depths
        );
    }
    for skipped in &report.skipped {
        warn!(
            "skipped model {} (master frame {}): {}",
            skipped.sprite_id, skipped.frame_number, skipped.error
        );
    }
}

fn run_models(
    cfg: &RigConfig,
    input: &Path,
    output: Option<&Path>,
    pretty: bool,
    shapes_dir: Option<&Path>,
) -> Result<()> {
    let stream = load_tag_stream(input)
        .with_context(|| format!("failed to load tag export {}", input.display()))?;
    let catalog = build_catalog(&stream, cfg)
        .with_context(|| format!("failed to build model catalog from {}", input.display()))?;
    log_report(&catalog.report);

    if let Some(dir) = shapes_dir {
        let missing = ShapeAssetResolver::new(dir).missing_shapes(&catalog.models);
        if !missing.is_empty() {
            warn!("{} referenced shapes have no SVG in {}", missing.len(), dir.display());
        }
    }

    let serializer = ResultSerializer::from_config(cfg);
    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            serializer
                .write(&catalog.models, &mut writer, pretty)
                .with_context(|| format!("failed to write {}", path.display()))?;
            writer
                .flush()
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!("{} models written to {}", catalog.models.len(), path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            serializer
                .write(&catalog.models, &mut stdout, pretty)
                .context("failed to write models to stdout")?;
            writeln!(stdout).context("failed to write models to stdout")?;
        }
    }
    Ok(())
}

fn run(args: Args) -> Result<()> {
    let cfg = load_config(&args)?;
    match &args.command {
        Command::Models {
            input,
            output,
            pretty,
            shapes_dir,
            ..
        } => run_models(&cfg, input, output.as_deref(), *pretty, shapes_dir.as_deref()),
        Command::StripShapes { input, output } => {
            let removed = strip_shape_definitions_file(input, output)
                .with_context(|| format!("failed to strip shapes from {}", input.display()))?;
            info!("{removed} shape definitions removed");
            Ok(())
        }
        Command::InlineSvgs { dir } => {
            let results = inline_svg_folder(dir)
                .with_context(|| format!("failed to inline SVGs in {}", dir.display()))?;
            let changed = results.iter().filter(|(_, outcome)| outcome.changed()).count();
            info!("{changed} of {} SVGs rewritten", results.len());
            Ok(())
        }
        Command::TextureSizes { dir } => {
            let patches = patch_texture_sizes(dir, cfg.global_scale_factor)
                .with_context(|| format!("failed to patch texture sizes in {}", dir.display()))?;
            info!("{} meta files patched", patches.len());
            Ok(())
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbosity);
    run(args)
}
