use anyhow::Context;
use chrono::Utc;
use prdigest::{
    GitHub, fetch_pull_requests, filter_by_date, group_by_month, parse_args, render_markdown,
    write_report,
};
use tracing::debug;

fn handle_clap_help_version(clap_err: &clap::Error) -> ! {
    use clap::error::ErrorKind;
    match clap_err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            print!("{clap_err}");
            std::process::exit(0);
        }
        _ => {
            eprint!("{clap_err}");
            std::process::exit(2);
        }
    }
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // Logs go to stderr so a report printed to stdout stays clean.
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let spec = match parse_args(std::env::args()) {
        Ok(spec) => spec,
        Err(err) => {
            if let Some(clap_err) = err.downcast_ref::<clap::Error>() {
                handle_clap_help_version(clap_err);
            } else {
                return Err(err);
            }
        }
    };

    let github = GitHub::from_env(spec.token.clone()).context("Failed to create GitHub client")?;

    let prs = fetch_pull_requests(&spec, &github)
        .await
        .with_context(|| format!("Failed to fetch PRs for {}", spec.search.repo))?;

    let filtered = filter_by_date(prs, &spec.range, Utc::now());
    let buckets = group_by_month(&filtered);
    debug!(months = buckets.len(), prs = filtered.len(), "Grouped PRs");

    let markdown = render_markdown(&buckets);
    let mut stdout = std::io::stdout().lock();

    write_report(&markdown, spec.output.as_deref(), &mut stdout)?;

    Ok(())
}
