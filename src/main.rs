//! CLI entry point for blogsite

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use blogsite::commands::list::ListOptions;

#[derive(Parser)]
#[command(name = "blogsite")]
#[command(version)]
#[command(about = "A static site generator for a personal Markdown/MDX blog", long_about = None)]
struct Cli {
    /// Set the site directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate static files
    #[command(alias = "g")]
    Generate {
        /// Watch for file changes
        #[arg(short, long)]
        watch: bool,
    },

    /// Start a local server
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "8000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Open browser automatically
        #[arg(short, long)]
        open: bool,

        /// Enable static mode (no file watching)
        #[arg(long)]
        r#static: bool,
    },

    /// Create a new post
    New {
        /// Title of the new post
        title: String,

        /// Content root to create the post in
        #[arg(short, long, default_value = "blog")]
        source: String,

        /// Slug (defaults to the slugified title)
        #[arg(long)]
        slug: Option<String>,
    },

    /// Remove the public folder
    Clean,

    /// List indexed documents
    List {
        /// Only documents from this content root
        #[arg(short, long)]
        source: Option<String>,

        /// Sort field (id, title, date, slug)
        #[arg(long)]
        sort: Option<String>,

        /// Sort ascending instead of descending
        #[arg(long)]
        asc: bool,

        /// Include undated documents
        #[arg(short, long)]
        all: bool,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.debug {
        "blogsite=debug,info"
    } else {
        "blogsite=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Generate { watch } => {
            let site = blogsite::Site::new(&base_dir)?;
            tracing::info!("Generating static files...");

            site.generate()?;
            println!("Generated successfully!");

            if watch {
                blogsite::commands::generate::watch(&site).await?;
            }
        }

        Commands::Server {
            port,
            ip,
            open,
            r#static,
        } => {
            let site = blogsite::Site::new(&base_dir)?;

            tracing::info!("Generating static files...");
            site.generate()?;

            tracing::info!("Starting server at http://{}:{}", ip, port);
            blogsite::server::start(&site, &ip, port, !r#static, open).await?;
        }

        Commands::New {
            title,
            source,
            slug,
        } => {
            let site = blogsite::Site::new(&base_dir)?;
            let path = blogsite::commands::new::create_post(&site, &title, &source, slug.as_deref())?;
            println!("Created: {}", path.display());
        }

        Commands::Clean => {
            let site = blogsite::Site::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            site.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List {
            source,
            sort,
            asc,
            all,
        } => {
            let site = blogsite::Site::new(&base_dir)?;
            let options = ListOptions {
                source,
                sort,
                ascending: asc,
                all,
            };
            blogsite::commands::list::run(&site, &options)?;
        }

        Commands::Version => {
            println!("blogsite version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
