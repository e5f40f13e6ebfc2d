use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use meridian_seo::cli;
use meridian_seo::config::ConfigArgs;

#[derive(Parser)]
#[command(
    name = "meridian",
    about = "Server-side SEO content injection for the Meridian travel storefront",
    version,
    after_help = "Run 'meridian <command> --help' for details on each command."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the injection server
    Serve {
        #[command(flatten)]
        config: ConfigArgs,
    },
    /// Print the injected document for one route
    Render {
        /// Route path, e.g. /packages/rome-city-break
        path: String,
        /// Print only the head block and content fragment
        #[arg(long)]
        fragment: bool,
        #[command(flatten)]
        config: ConfigArgs,
    },
    /// Print sitemap XML
    Sitemap {
        /// Section name (pages, tours, packages, destinations, blog); omit for the index
        section: Option<String>,
        #[command(flatten)]
        config: ConfigArgs,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve { config } => cli::serve_cmd::run(config).await,
        Commands::Render {
            path,
            fragment,
            config,
        } => cli::render_cmd::run(config, &path, fragment).await,
        Commands::Sitemap { section, config } => {
            cli::sitemap_cmd::run(config, section.as_deref()).await
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "meridian", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = &result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    result
}
