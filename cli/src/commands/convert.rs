use vistask_core::config::{AppConfig, ConvertConfig};
use vistask_core::convert::{Converter, DatasetProfile};
use vistask_core::error::{CliError, ConfigError};
use vistask_core::ConvertOptions;
use vistask_plugins::factory;

use super::cli::ConvertArgs;

/// Config file values with command-line flags layered on top.
pub fn resolve_options(
    args: &ConvertArgs,
    cfg: &ConvertConfig,
) -> Result<ConvertOptions, ConfigError> {
    let mut options = ConvertOptions::from_config(cfg)?;
    if let Some(split) = &args.split {
        options.split = split.clone();
    }
    if let Some(output) = &args.output {
        options.output_root = output.clone();
    }
    if args.limit.is_some() {
        options.limit = args.limit;
    }
    if let Some(schema) = args.schema {
        options.schema = schema.into();
    }
    Ok(options)
}

pub async fn run(args: ConvertArgs, cfg: &AppConfig) -> Result<i32, CliError> {
    let dataset = args.dataset.as_deref().unwrap_or(&cfg.convert.dataset);
    let profile = DatasetProfile::lookup(dataset)?;
    let options = resolve_options(&args, &cfg.convert)?;
    if let Some(manifest) = args.manifest.as_deref() {
        if !manifest.is_file() {
            return Err(ConfigError::MissingManifest(manifest.display().to_string()).into());
        }
    }

    std::fs::create_dir_all(&options.output_root)?;

    match args.manifest.as_deref() {
        Some(m) => println!("Reading {} ({})...", profile.name, m.display()),
        None => println!("Downloading {} (split: {})...", profile.repo_id, options.split),
    }
    let mut source = factory::build_source(profile, &options.split, args.manifest.as_deref()).await?;

    let total = options.planned_total(source.len_hint());
    let total_label = total.map_or_else(|| "?".to_string(), |n| n.to_string());
    println!("Processing {total_label} samples...");

    let mut converter = Converter::new(profile, options)
        .on_progress(|p| println!("Processed {}/{}", p.converted, total_label));
    let report = converter.run(&mut *source);

    println!(
        "\n✓ Successfully converted {}/{} samples",
        report.converted, report.attempted
    );
    Ok(0)
}
