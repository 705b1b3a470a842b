//! Docroot - static file resources from the command line
//!
//! This is the main entry point for the docroot CLI.

use std::io::Write;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use docroot_core::config::{ConfigLoader, DocrootConfig, LogFormat};
use docroot_static::{FileResource, FileServer, MimeTable, ResourceContext};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Docroot - serve, list and edit files the way a static file server sees them
#[derive(Parser)]
#[command(name = "docroot")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (.toml or .json)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a request path against the root and print what would be served
    Serve {
        /// Request path, e.g. /docs/
        path: String,

        /// Document root (overrides the configuration)
        #[arg(long)]
        root: Option<String>,
    },

    /// Print the HTML listing of a directory
    List {
        /// Directory to list
        dir: String,

        /// Request path shown in the title and used for links
        #[arg(long, default_value = "/")]
        target: String,
    },

    /// Print a file's content
    Cat {
        path: String,
    },

    /// Show the extension and MIME type derived for a path
    Mime {
        path: String,

        /// Take the last extension as-is instead of negotiating
        #[arg(long)]
        plain: bool,
    },

    /// List sibling variants of a file (page.en.html for page.html)
    Matches {
        path: String,

        /// Take the last extension as-is instead of negotiating
        #[arg(long)]
        plain: bool,
    },

    /// Write a file, truncating it unless --append is given
    Put {
        path: String,

        body: String,

        /// Append to an existing file instead
        #[arg(long)]
        append: bool,
    },

    /// Remove a file
    Rm {
        path: String,
    },

    /// Show existence, type and modification time
    Stat {
        path: String,
    },

    /// Validate a configuration file
    Validate {
        #[arg(value_name = "CONFIG")]
        file: String,
    },

    /// Show version information
    Version,
}

fn init_tracing(config: &DocrootConfig, verbose: bool) {
    let level = if verbose || config.debug {
        "debug".to_string()
    } else {
        config.logging.level.clone()
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);

    // stdout carries file content, logs go to stderr
    match config.logging.format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ConfigLoader::load(path)?,
        None => DocrootConfig::default(),
    };

    init_tracing(&config, cli.verbose);

    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    let ctx = ResourceContext::default().with_mimes(Arc::new(MimeTable::from_config(&config.files)));
    let mut stdout = std::io::stdout().lock();

    match cli.command {
        Commands::Serve { path, root } => {
            let mut files = config.files.clone();
            if let Some(root) = root {
                files.root = root;
            }
            tracing::info!("Serving {} from {}", path, files.root);

            let server = FileServer::new(files, ctx);
            match server.serve(&path)? {
                Some(served) => {
                    eprintln!("Content-Type: {}", served.mime_type);
                    if let Some(date) = &served.last_modified {
                        eprintln!("Last-Modified: {}", date);
                    }
                    stdout.write_all(&served.content)?;
                }
                None => anyhow::bail!("Not found: {}", path),
            }
        }

        Commands::List { dir, target } => {
            let resource = FileResource::with_path(ctx, &dir);
            let html = resource.auto_index(&target)?;
            stdout.write_all(html.as_bytes())?;
        }

        Commands::Cat { path } => {
            let mut resource = FileResource::with_path(ctx, &path);
            resource.try_open(false)?;
            let content = resource.get_bytes()?;
            stdout.write_all(&content)?;
        }

        Commands::Mime { path, plain } => {
            let mut resource = FileResource::new(ctx);
            resource.set_path(&path, !plain && config.files.negotiate);
            writeln!(stdout, "{}\t{}", resource.mime_extension(), resource.mime_type())?;
        }

        Commands::Matches { path, plain } => {
            let mut resource = FileResource::new(ctx);
            resource.set_path(&path, !plain && config.files.negotiate);
            resource.parse_match()?;
            for name in resource.matches() {
                writeln!(stdout, "{}", name)?;
            }
        }

        Commands::Put { path, body, append } => {
            let mut resource = FileResource::with_path(ctx, &path);
            if append {
                resource.append(&body)?;
            } else {
                resource.create(&body)?;
            }
            tracing::debug!("Wrote {} bytes to {}", body.len(), resource.path());
        }

        Commands::Rm { path } => {
            let mut resource = FileResource::with_path(ctx, &path);
            resource.unlink()?;
        }

        Commands::Stat { path } => {
            let resource = FileResource::with_path(ctx, &path);
            writeln!(stdout, "exists: {}", resource.exists())?;
            writeln!(stdout, "directory: {}", resource.is_directory())?;
            if let Some(date) = resource.last_modified() {
                writeln!(stdout, "last-modified: {}", date)?;
            }
        }

        Commands::Validate { file } => {
            tracing::info!("Validating config: {}", file);

            match ConfigLoader::load(&file) {
                Ok(_) => {
                    writeln!(stdout, "✅ Configuration '{}' is valid!", file)?;
                }
                Err(e) => {
                    eprintln!("❌ Configuration Error: {}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Version => {
            writeln!(stdout, "Docroot v{}", docroot_core::VERSION)?;
        }
    }

    Ok(())
}
