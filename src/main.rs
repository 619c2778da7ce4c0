use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use log::{info, warn, LevelFilter};
use simplelog::{Config, TermLogger, TerminalMode, ColorChoice};
use tokio::runtime::Runtime;
use clap::Parser;

use comfy_uploader::cli::{Args, Commands, DropOpts, FolderOpts, ImagesOpts};
use comfy_uploader::cloud::client::HttpTransport;
use comfy_uploader::collectors::{local_entry_with_batch_size, SelectedFolder};
use comfy_uploader::config::{load_or_create_config, UploaderConfig};
use comfy_uploader::models::NamedBlob;
use comfy_uploader::notifications::LogSink;
use comfy_uploader::upload::{UploadReport, Uploader};
use comfy_uploader::utils::summary::create_upload_summary;

type CliUploader = Uploader<HttpTransport, LogSink>;

fn main() -> Result<()> {
    // Parse arguments
    let args = Args::parse();

    // Initialize logging
    initialize_logging(args.verbose)?;

    if let Commands::InitConfig { path } = &args.command {
        info!("Creating default configuration file at {}", path.display());
        UploaderConfig::create_default_config_file(path)?;
        info!("Configuration created successfully");
        return Ok(());
    }

    // Load and process configuration
    let config = load_config(&args)?;
    info!("Using server {}", config.server_url);

    let transport = HttpTransport::new(&config.server_url, config.connect_timeout())
        .context("Failed to create HTTP client")?;
    let uploader = Uploader::new(transport, LogSink::new())
        .with_capabilities(config.capabilities)
        .with_timeouts(config.notification_timeouts());

    let runtime = Runtime::new().context("Failed to create tokio runtime")?;
    let report = runtime.block_on(run_command(&uploader, &config, &args.command))?;

    let Some(report) = report else {
        return Ok(());
    };

    if let Some(report_path) = &args.report {
        write_report(report_path, &report, &config.server_url)?;
    }

    if report.is_success() {
        info!("Upload completed successfully");
        Ok(())
    } else {
        Err(anyhow!("{} upload(s) failed", report.failure_count()))
    }
}

/// Initialize logging with the specified verbosity level
fn initialize_logging(verbose: bool) -> Result<()> {
    let log_level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };
    TermLogger::init(
        log_level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    ).context("Failed to initialize logger")?;
    Ok(())
}

/// Load the config file and let command-line flags override it
fn load_config(args: &Args) -> Result<UploaderConfig> {
    let mut config = load_or_create_config(args.config.as_deref())?;
    if let Some(server) = &args.server {
        config.server_url = server.trim_end_matches('/').to_string();
    }
    Ok(config)
}

async fn run_command(
    uploader: &CliUploader,
    config: &UploaderConfig,
    command: &Commands,
) -> Result<Option<UploadReport>> {
    match command {
        Commands::Dirs => {
            let directories = uploader.list_directories().await?;
            println!("(input root)");
            for dir in directories {
                println!("{}", dir);
            }
            Ok(None)
        }
        Commands::Images(opts) => upload_images(uploader, config, opts).await.map(Some),
        Commands::Folder(opts) => upload_folder(uploader, config, opts).await.map(Some),
        Commands::Drop(opts) => upload_dropped(uploader, config, opts).await.map(Some),
        Commands::InitConfig { .. } => Ok(None),
    }
}

fn parent_or_default<'a>(requested: &'a Option<String>, config: &'a UploaderConfig) -> &'a str {
    requested.as_deref().unwrap_or(&config.default_parent_dir)
}

async fn upload_images(uploader: &CliUploader, config: &UploaderConfig, opts: &ImagesOpts) -> Result<UploadReport> {
    let mut blobs = Vec::with_capacity(opts.files.len());
    let mut unreadable = 0;
    for path in &opts.files {
        match read_named(path).await {
            Ok(blob) => blobs.push(blob),
            Err(e) => {
                warn!("{:#}", e);
                unreadable += 1;
            }
        }
    }

    let target_dir = parent_or_default(&opts.target_dir, config);
    let mut outcome = uploader.upload_files(blobs, target_dir).await?;
    outcome.unreadable = unreadable;

    Ok(UploadReport {
        folders: Vec::new(),
        files: Some(outcome),
    })
}

async fn read_named(path: &Path) -> Result<NamedBlob> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| anyhow!("{} has no file name", path.display()))?;
    let content = tokio::fs::read(path)
        .await
        .context(format!("Failed to read {}", path.display()))?;
    Ok(NamedBlob::new(name, content))
}

async fn upload_folder(uploader: &CliUploader, config: &UploaderConfig, opts: &FolderOpts) -> Result<UploadReport> {
    let dir: PathBuf = opts.dir.clone();
    let folder = tokio::task::spawn_blocking(move || SelectedFolder::from_local_dir(&dir))
        .await
        .context("Folder listing task failed")??;

    for line in folder.default_preview() {
        info!("{}", line);
    }

    let parent_dir = parent_or_default(&opts.parent_dir, config);
    let outcome = uploader
        .upload_selected_folder(folder, opts.name.as_deref(), parent_dir)
        .await?;

    Ok(UploadReport {
        folders: vec![outcome],
        files: None,
    })
}

async fn upload_dropped(uploader: &CliUploader, config: &UploaderConfig, opts: &DropOpts) -> Result<UploadReport> {
    let mut entries = Vec::with_capacity(opts.paths.len());
    for path in &opts.paths {
        match local_entry_with_batch_size(path, config.local_batch_size).await {
            Ok(entry) => entries.push(entry),
            Err(e) => warn!("Skipping {}: {:#}", path.display(), e),
        }
    }

    if entries.is_empty() {
        return Err(anyhow!("None of the given paths could be accessed"));
    }

    let parent_dir = parent_or_default(&opts.parent_dir, config);
    Ok(uploader.upload_entries(entries, parent_dir).await?)
}

/// Write the JSON report of the run
fn write_report(path: &Path, report: &UploadReport, server_url: &str) -> Result<()> {
    let summary = create_upload_summary(report, server_url)?;
    fs::write(path, summary)
        .context(format!("Failed to write report to {}", path.display()))?;
    info!("Wrote upload report to {}", path.display());
    Ok(())
}
