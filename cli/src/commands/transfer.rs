use std::path::Path;

use vistask_core::config::{AppConfig, TransferConfig};
use vistask_core::error::{CliError, ConfigError};
use vistask_core::transfer::{
    download_prefix_with_progress, upload_directory_with_progress, ObjectStore, TransferOptions,
};
use vistask_plugins::factory;

use super::cli::{Action, TransferArgs};

pub fn resolve_config(args: &TransferArgs, cfg: &TransferConfig) -> TransferConfig {
    let mut out = cfg.clone();
    if let Some(prefix) = &args.prefix {
        out.prefix = prefix.clone();
    }
    if let Some(endpoint) = &args.endpoint {
        out.endpoint = Some(endpoint.clone());
    }
    out
}

pub async fn run(args: TransferArgs, cfg: &AppConfig) -> Result<i32, CliError> {
    let transfer_cfg = resolve_config(&args, &cfg.transfer);
    let opts = TransferOptions::from_config(&transfer_cfg);

    match args.action {
        Action::Upload => {
            let input = args.input.as_deref().ok_or(ConfigError::MissingFlag {
                flag: "--input",
                action: "upload",
            })?;
            if !input.is_dir() {
                return Err(ConfigError::MissingInput(input.display().to_string()).into());
            }
            let store = factory::build_store(&args.bucket, &transfer_cfg).await?;
            upload(store.as_ref(), input, &opts).await
        }
        Action::Download => {
            let output = args.output.as_deref().ok_or(ConfigError::MissingFlag {
                flag: "--output",
                action: "download",
            })?;
            let store = factory::build_store(&args.bucket, &transfer_cfg).await?;
            download(store.as_ref(), output, &opts).await
        }
    }
}

async fn upload(
    store: &dyn ObjectStore,
    input: &Path,
    opts: &TransferOptions,
) -> Result<i32, CliError> {
    println!("Uploading {} to {}/{}...", input.display(), store.name(), opts.prefix);
    let report = upload_directory_with_progress(store, input, opts, &mut |p| {
        println!("Uploaded {}/{} files...", p.done, p.total)
    })
    .await?;
    for path in &report.failed {
        println!("Failed to upload: {}", path.display());
    }
    println!(
        "\n✓ Upload complete: {} successful, {} failed",
        report.uploaded,
        report.failed.len()
    );
    Ok(0)
}

async fn download(
    store: &dyn ObjectStore,
    output: &Path,
    opts: &TransferOptions,
) -> Result<i32, CliError> {
    println!("Downloading from {}/{}...", store.name(), opts.prefix);
    std::fs::create_dir_all(output)?;
    let report = download_prefix_with_progress(store, output, opts, &mut |p| {
        println!("Downloaded {}/{} files...", p.done, p.total)
    })
    .await?;
    for key in &report.failed {
        println!("Failed to download: {key}");
    }
    println!("\n✓ Download complete: {} files", report.downloaded);
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn prefix_flag_overrides_config() {
        let args = TransferArgs::parse_from([
            "vistask-transfer",
            "--action",
            "download",
            "--bucket",
            "b",
            "--prefix",
            "datasets/",
        ]);
        let cfg = TransferConfig {
            prefix: "old/".into(),
            max_retries: 3,
            ..Default::default()
        };
        let out = resolve_config(&args, &cfg);
        assert_eq!(out.prefix, "datasets/");
        assert_eq!(out.max_retries, 3);
        assert_eq!(out.endpoint, None);
    }

    #[test]
    fn action_is_required() {
        assert!(TransferArgs::try_parse_from(["vistask-transfer", "--bucket", "b"]).is_err());
    }
}
