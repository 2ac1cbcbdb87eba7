use clap::{Parser, Subcommand};
use makeweb::build::{self, BuildOptions};
use makeweb::convert::Capabilities;
use makeweb::{config, output};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "makeweb")]
#[command(about = "Static site generator: JSON front-matter, layered variables, Jinja templates")]
#[command(long_about = "\
Static site generator: JSON front-matter, layered variables, Jinja templates

Every file under the input directory is mirrored into the output directory:

  input/
  ├── global.json          # Required. Variables shared by every page
  ├── index.html           # Rendered (.html .htm .source .md)
  ├── base.template        # Partial: usable by include/extends, never output
  ├── vars/blog.json       # Variable file, pulled in with \"use\"
  └── assets/logo.png      # Hard-linked as-is

A page may start with a JSON object ended by a line that is exactly ---:

  {\"format\": \"md\", \"use\": [\"vars/blog.json\"]}
  ---
  # {{ title }}

Variable precedence (last wins): front-matter, global.json, \"use\" files,
\"use_builtin\" files. \"render\": false skips a page.

Run 'makeweb gen-config' to print a documented makeweb.toml.")]
#[command(version)]
struct Cli {
    /// Input directory
    #[arg(long, default_value = "input", global = true)]
    input: PathBuf,

    /// Output directory
    #[arg(long, default_value = "output", global = true)]
    output: PathBuf,

    /// Configuration file (optional; defaults apply when it does not exist)
    #[arg(long, default_value = "makeweb.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Render the input directory into the output directory (default)
    Build,
    /// Print a stock makeweb.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("makeweb=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Build) {
        Command::Build => {
            let site_config = config::load_config(&cli.config)?;
            std::fs::create_dir_all(&cli.input)?;
            std::fs::create_dir_all(&cli.output)?;

            let options = BuildOptions {
                input: cli.input,
                output: cli.output,
                config: site_config,
                capabilities: Capabilities::detect(),
            };
            let summary = build::build(&options, output::print_file_event)?;
            output::print_summary(&summary);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
