use std::path::PathBuf;
use std::sync::Arc;
use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::sync::broadcast::error::RecvError;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use dropzone::config::{Config, DEFAULT_CONFIG_FILE};
use dropzone::view::{ColumnKey, SortDirection, SortSpec, TableView};
use dropzone::{FileDescriptor, PresignedUploader, UploadConfig, UploadEvent, UploadOrchestrator};

#[derive(Parser, Debug)]
#[command(name = "dropzone", version, about = "Upload files through pre-signed URLs")]
struct Cli {
    /// Path to the config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload files one after another and print the result table
    Upload {
        /// Files to upload
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Pre-signed URL endpoint, overrides the config file
        #[arg(long)]
        endpoint: Option<String>,

        /// Maximum file size in bytes
        #[arg(long)]
        max_size: Option<u64>,

        /// Allowed MIME type, can be repeated
        #[arg(long = "allow")]
        allowed_types: Vec<String>,

        /// Only show rows whose name, type or status contains this text
        #[arg(long, default_value = "")]
        filter: String,

        /// Column to sort by
        #[arg(long, default_value = "uploaded_at")]
        sort: ColumnKey,

        /// Sort descending
        #[arg(long)]
        desc: bool,
    },
}

fn load_config(cli_path: Option<PathBuf>, endpoint: Option<String>) -> anyhow::Result<Config> {
    let path = cli_path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

    if path.exists() {
        let mut config = Config::load_config(&path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?;
        if let Some(endpoint) = endpoint {
            config.upload.endpoint_url = endpoint;
            config.upload.validate()?;
        }
        return Ok(config);
    }

    let endpoint = endpoint
        .with_context(|| format!("No {} found and no --endpoint given", path.display()))?;
    let upload = UploadConfig::new(endpoint);
    upload.validate()?;

    Ok(Config {
        log_level: "info".to_string(),
        upload,
        table: Default::default(),
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Upload { files, endpoint, max_size, allowed_types, filter, sort, desc } => {
            let mut config = load_config(cli.config, endpoint)?;
            if let Some(max_size) = max_size {
                config.upload.max_file_size = Some(max_size);
            }
            if !allowed_types.is_empty() {
                config.upload.allowed_types = allowed_types.into_iter().collect();
            }

            let filter_layer = EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
            tracing_subscriber::fmt().with_env_filter(filter_layer).init();

            let mut selection = Vec::with_capacity(files.len());
            for path in &files {
                let file = FileDescriptor::from_path(path)
                    .await
                    .with_context(|| format!("Failed to read file: {}", path.display()))?;
                selection.push(file);
            }

            let uploader = PresignedUploader::new(&config.upload)?;
            let orchestrator = UploadOrchestrator::new(Arc::new(uploader), config.upload.clone());

            let mut events = orchestrator.subscribe_events();
            let printer = tokio::spawn(async move {
                loop {
                    let event = match events.recv().await {
                        Ok(event) => event,
                        Err(RecvError::Lagged(skipped)) => {
                            warn!(skipped, "Event printer lagged");
                            continue;
                        }
                        Err(RecvError::Closed) => break,
                    };

                    match event {
                        UploadEvent::Selected { records } => info!(count = records.len(), "Files selected"),
                        UploadEvent::Started { record } => info!(file = %record.name, "Uploading"),
                        UploadEvent::Progress { record } => info!(file = %record.name, "{}%", record.progress),
                        UploadEvent::Completed { record } => {
                            info!(file = %record.name, key = ?record.remote_key, "Completed")
                        }
                        UploadEvent::Failed { record, error } => warn!(file = %record.name, %error, "Failed"),
                        UploadEvent::Action(action) => info!(?action, "Host action"),
                    }
                }
            });

            let records = orchestrator.process_selection(selection).await?;
            drop(orchestrator);
            if let Err(err) = printer.await {
                error!(%err, "Event printer stopped");
            }

            let mut view = TableView::new(config.table.columns());
            let direction = if desc { SortDirection::Desc } else { SortDirection::Asc };
            view.set_sort(SortSpec::new(sort, direction));
            view.set_filter(filter);
            view.set_records(records);
            println!("{}", view.render());
        }
    }

    Ok(())
}
