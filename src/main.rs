use clap::Parser;
use stagecraft::cli::Cli;
use stagecraft::ui;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = std::env::var("LOGGING")
        .or_else(|_| std::env::var("LOG_LEVEL"))
        .unwrap_or_else(|_| if cli.verbose { "debug".to_string() } else { "info".to_string() });

    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    if let Err(e) = stagecraft::run(cli).await {
        ui::print_error(&e.to_string());
        std::process::exit(e.exit_code());
    }
}
