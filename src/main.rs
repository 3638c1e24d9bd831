//! Answer Browser
//!
//! Entry point for the answer browser application.

use answer_browser::cli::Repl;
use answer_browser::{AppConfig, AppContext, NAME, VERSION};
use std::env;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().skip(1).collect();
    let mut config = AppConfig::from_env();
    if args.iter().any(|a| a == "--ephemeral") {
        config = config.ephemeral();
    }

    if args.iter().any(|a| a == "--cli") {
        run_cli_mode(config);
    } else {
        run_gui_mode(config);
    }
}

fn run_cli_mode(config: AppConfig) {
    println!("🚀 {} v{}", NAME, VERSION);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("❌ Failed to start async runtime: {}", e);
            std::process::exit(1);
        }
    };

    let result = runtime.block_on(async {
        let ctx = AppContext::from_config(&config)?;
        let stdin = std::io::stdin();
        let mut repl = Repl::new(ctx, std::io::stdout());
        repl.run(stdin.lock()).await
    });

    if let Err(e) = result {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}

fn run_gui_mode(config: AppConfig) {
    println!("🚀 {} v{} - Starting GUI...", NAME, VERSION);

    if let Err(e) = answer_browser::ui::run(config) {
        eprintln!("❌ Failed to start browser: {}", e);
        std::process::exit(1);
    }
}
