use anyhow::Context;
use clap::{Parser, Subcommand};
use log::{error, info};
use slant::{
    build, Config, Dispatch, Keychord, Profile, Rect, Result, ScreenMetrics, Window, WindowId,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "slant")]
#[command(about = "Keychord-bound window geometry presets")]
struct Cli {
    #[arg(short, long, help = "Configuration file path")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Write a built-in profile to the configuration path")]
    Init {
        #[arg(short, long, default_value = "extended", help = "basic or extended")]
        profile: Profile,
        #[arg(short, long, help = "Overwrite an existing file")]
        force: bool,
    },
    #[command(about = "Load and validate the configuration")]
    Check,
    #[command(about = "List bindings and the operations they trigger")]
    List {
        #[arg(long, help = "Print JSON")]
        json: bool,
    },
    #[command(about = "Show the geometry a keychord would produce")]
    Resolve {
        #[arg(help = "Keychord, e.g. return:cmd,shift")]
        keychord: String,
        #[arg(long, default_value = "1920x1080+0+0", value_parser = parse_geometry)]
        screen: Rect,
        #[arg(long, default_value = "800x600+100+100", value_parser = parse_geometry)]
        window: Rect,
        #[arg(long, help = "Print JSON")]
        json: bool,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.unwrap_or_else(|| {
        PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
            .join(".config")
            .join("slant")
            .join("config.toml")
    });

    match cli.command {
        Some(Commands::Init { profile, force }) => init(&config_path, profile, force),
        Some(Commands::Check) | None => {
            let tables = build(&Config::load(&config_path)?)
                .with_context(|| format!("invalid configuration {}", config_path.display()))?;
            println!(
                "{}: {} operations, {} bindings",
                config_path.display(),
                tables.operations().len(),
                tables.bindings().len()
            );
            Ok(())
        }
        Some(Commands::List { json }) => {
            let tables = build(&Config::load(&config_path)?)?;
            if json {
                let entries: Vec<_> = tables
                    .bindings()
                    .iter()
                    .map(|(chord, name)| {
                        let operation = tables.operations().get(name);
                        serde_json::json!({
                            "keychord": chord.to_string(),
                            "operation": name,
                            "kind": operation.map(|op| op.kind()),
                            "parameters": operation.map(|op| op.parameters()),
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                for (chord, name) in tables.bindings().iter() {
                    println!("{:<20} {}", chord.to_string(), name);
                }
            }
            Ok(())
        }
        Some(Commands::Resolve {
            keychord,
            screen,
            window,
            json,
        }) => {
            let tables = build(&Config::load(&config_path)?)?;
            let chord: Keychord = keychord.parse()?;
            let screen = ScreenMetrics::from(screen);
            let mut focused = Window::new(WindowId(0), "resolve", window);

            let result = tables.dispatch(&chord, Some(&mut focused), &screen)?;
            if json {
                let value = match &result {
                    Dispatch::Applied { operation, frame } => {
                        serde_json::json!({ "keychord": chord.to_string(), "operation": operation, "frame": frame })
                    }
                    _ => serde_json::json!({ "keychord": chord.to_string(), "operation": null }),
                };
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                match result {
                    Dispatch::Applied { operation, frame } => println!(
                        "{} -> {}: x={} y={} width={} height={}",
                        chord, operation, frame.x, frame.y, frame.width, frame.height
                    ),
                    _ => println!("{} is not bound", chord),
                }
            }
            Ok(())
        }
    }
}

fn init(path: &Path, profile: Profile, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    profile.config().save(path)?;
    info!("Wrote {} profile to {:?}", profile, path);
    println!("Wrote {} profile to {}", profile, path.display());
    Ok(())
}

/// Parses `WxH` or `WxH+X+Y`.
fn parse_geometry(s: &str) -> std::result::Result<Rect, String> {
    let invalid = || format!("expected WIDTHxHEIGHT[+X+Y], got {:?}", s);
    let number = |part: &str| part.trim().parse::<f64>().map_err(|_| invalid());

    let mut parts = s.split('+');
    let size = parts.next().ok_or_else(invalid)?;
    let (width, height) = size.split_once('x').ok_or_else(invalid)?;
    let (x, y) = match (parts.next(), parts.next(), parts.next()) {
        (None, None, None) => (0.0, 0.0),
        (Some(x), Some(y), None) => (number(x)?, number(y)?),
        _ => return Err(invalid()),
    };

    Ok(Rect::new(x, y, number(width)?, number(height)?))
}
