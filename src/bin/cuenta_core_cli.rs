use std::{path::PathBuf, process, thread};

use clap::{Parser, Subcommand};
use cuenta_core::{
    config::{Config, ConfigManager},
    init,
    ledger::LedgerView,
    notification::{NotificationKind, NotificationRuntime},
    report::{format_notification, render_detail, summary_table},
    utils::persistence::load_entries_from_file,
};

const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("CUENTA_CORE_BUILD_HASH"),
    ", ",
    env!("CUENTA_CORE_BUILD_TIMESTAMP"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "cuenta_core_cli", version = VERSION, about = "Inspect current-account ledger exports")]
struct Cli {
    /// Configuration file (defaults to the user configuration directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Disable colors and box drawing characters
    #[arg(long, global = true)]
    plain: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Per-year totals across tax groups
    Summary {
        file: PathBuf,
        /// Print the summaries as JSON
        #[arg(long)]
        json: bool,
    },
    /// Tax-group detail for one year
    Detail {
        file: PathBuf,
        #[arg(long)]
        year: Option<i32>,
        /// Tax group to expand; may be repeated
        #[arg(long = "expand")]
        expand: Vec<String>,
    },
    /// Publish notifications and print the queue until it drains
    NotifyDemo {
        #[arg(long, default_value = "Ledger synchronized")]
        message: String,
    },
}

fn main() {
    init();

    if let Err(err) = run() {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let manager = match &cli.config {
        Some(path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new()?,
    };
    let config = manager.load()?;
    let plain = cli.plain || !config.ui_color_enabled;
    if plain {
        colored::control::set_override(false);
    }

    match cli.command {
        Command::Summary { file, json } => {
            let view = LedgerView::new(load_entries_from_file(&file)?);
            if json {
                println!("{}", serde_json::to_string_pretty(&view.summaries())?);
            } else {
                println!("{}", summary_table(&view.summaries(), plain).render());
            }
        }
        Command::Detail { file, year, expand } => {
            let mut view = LedgerView::new(load_entries_from_file(&file)?);
            view.select_year(year.or(config.default_year));
            for group in &expand {
                view.toggle(group);
            }
            println!("{}", render_detail(&view, plain));
        }
        Command::NotifyDemo { message } => notify_demo(&config, message, plain)?,
    }
    Ok(())
}

fn notify_demo(
    config: &Config,
    message: String,
    plain: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = NotificationRuntime::start(&config.notifications)?;
    let queue = runtime.queue().clone();
    let printer = queue.clone();
    let subscription = queue.subscribe(move || {
        let current = printer.get_all();
        println!("-- {} notification(s)", current.len());
        for notification in current.iter().rev() {
            println!("{}", format_notification(notification, plain));
        }
    });

    queue.show(message.clone(), NotificationKind::Info);
    queue.success("Payment registered");
    queue.show(message, NotificationKind::Info);

    thread::sleep(config.notifications.drain_wait());

    subscription.unsubscribe();
    runtime.shutdown();
    Ok(())
}
