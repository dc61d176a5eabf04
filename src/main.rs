//! appmenu - Application Menu Inspector
//!
//! Builds the merged default menu template for a platform and prints it,
//! either as an indented outline or as the `update-application-menu`
//! message the rendering process receives.

use appmenu::config::Config;
use appmenu::keybinding::KeystrokeMap;
use appmenu::menu::{self, MenuItem};
use appmenu::platform::{self, Platform};
use appmenu::renderer::MenuUpdate;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Inspect the application menu template for a platform.
#[derive(Parser)]
#[command(
    name = "appmenu",
    version,
    about,
    long_about = "\
Inspect the application menu template for a platform.\n\n\
Run without arguments to print the merged default menu as an outline.\n\n\
Environment variables:\n  \
APPMENU_SNAPSHOT  Override the snapshot path from the config file"
)]
struct Cli {
    /// Print the update-application-menu JSON message instead of an outline
    #[arg(long)]
    json: bool,

    /// Platform to build the menu for (linux, macos, windows)
    #[arg(long, value_name = "PLATFORM")]
    platform: Option<String>,

    /// Directory containing per-platform menu definitions
    #[arg(long, value_name = "DIR")]
    menus_dir: Option<PathBuf>,

    /// Print the loaded configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.print_config {
        println!("{:#?}", Config::load());
        return;
    }

    let platform = match &cli.platform {
        Some(name) => match Platform::from_name(name) {
            Some(platform) => platform,
            None => {
                eprintln!("Unknown platform \"{}\" (expected linux, macos, or windows)", name);
                std::process::exit(1);
            }
        },
        None => Platform::current(),
    };

    let config = Config::load();
    let menus_dir = cli.menus_dir.or(config.menus_dir);

    let items = match platform::default_menu(platform, menus_dir.as_deref()) {
        Ok(items) => items,
        Err(e) => {
            eprintln!("Failed to load default menu: {:#}", e);
            std::process::exit(1);
        }
    };

    // Run the definitions through the same normalize-and-merge path the
    // menu manager uses, so the output shows the effective template.
    let mut template: Vec<MenuItem> = Vec::new();
    for mut item in items {
        item.normalize(platform);
        menu::merge(&mut template, item, platform);
    }

    if cli.json {
        let keystrokes = KeystrokeMap::new();
        let update = MenuUpdate::new(&template, &keystrokes);
        match serde_json::to_string_pretty(&update) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Failed to serialize menu update: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        print_outline(&template, 0);
    }
}

/// Print the template as an indented outline, one item per line.
fn print_outline(items: &[MenuItem], depth: usize) {
    for item in items {
        let indent = "  ".repeat(depth);
        match (&item.command, &item.submenu) {
            (Some(command), _) => println!("{}{}  [{}]", indent, item.label, command),
            (None, Some(submenu)) => {
                println!("{}{}", indent, item.label);
                print_outline(submenu, depth + 1);
            }
            (None, None) => println!("{}{}", indent, item.label),
        }
    }
}

/// Map `-v` counts onto a tracing filter, honoring `RUST_LOG` overrides.
fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("appmenu={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .without_time()
        .init();
}
