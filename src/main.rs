use std::path::PathBuf;

use clap::Parser;

use mdsite::config::SiteConfig;
use mdsite::site;

#[derive(Parser)]
#[command(name = "mdsite")]
#[command(about = "Build a static HTML site from Markdown content")]
struct Cli {
    /// Project root containing the content and static directories
    #[arg(default_value = ".")]
    root: PathBuf,

    /// Config file (defaults to site.toml under the project root)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(|| cli.root.join("site.toml"));
    let config = SiteConfig::load(&config_path);

    match site::build_site(&cli.root, &config) {
        Ok(summary) => {
            println!(
                "Generated {} pages and {} assets in {}",
                summary.pages,
                summary.assets,
                cli.root.join(&config.output_dir).display()
            );
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
