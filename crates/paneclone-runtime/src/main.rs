//! paneclone: clone the ssh or container session of a tmux pane into a new
//! split, and keep pane profiles in step with remote sessions.

use clap::Parser;

mod cli;
mod cmd_clone;
mod cmd_detect;
mod cmd_watch;
mod context;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    let filter = std::env::var("PANECLONE_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    let ctx = context::Context::load(&args);

    match &args.command {
        cli::Command::Detect(opts) => {
            let pane = context::target_pane(&opts.target)?;
            cmd_detect::cmd_detect(&ctx, &pane, opts.json)?;
        }
        cli::Command::Menu(opts) => {
            let pane = context::target_pane(opts)?;
            cmd_detect::cmd_menu(&ctx, &pane)?;
        }
        cli::Command::Clone(opts) => {
            let pane = context::target_pane(&opts.target)?;
            cmd_clone::cmd_clone(&ctx, &pane, opts.split, opts.tick_ms).await?;
        }
        cli::Command::Split(opts) => {
            let pane = context::target_pane(&opts.target)?;
            cmd_clone::cmd_split(&ctx, &pane, opts.split, opts.tick_ms).await?;
        }
        cli::Command::Watch(opts) => {
            cmd_watch::cmd_watch(&ctx, opts.interval_ms).await?;
        }
        cli::Command::ToggleAutoClone => {
            cmd_detect::cmd_toggle_auto_clone(&ctx)?;
        }
    }

    Ok(())
}
