//! hnrss CLI - render Hacker News search results as RSS

use clap::{Parser, Subcommand};
use hnrss::{Feed, FeedResponse};
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// hnrss - Hacker News search results as RSS
#[derive(Parser, Debug)]
#[command(name = "hnrss")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a saved search API response as an RSS feed
    Render {
        /// Search API response JSON (reads stdin when omitted)
        #[arg(long, short)]
        input: Option<PathBuf>,

        /// URL the feed was requested at (used for the atom self link)
        #[arg(long)]
        url: String,

        /// Channel title
        #[arg(long)]
        title: Option<String>,

        /// Channel link
        #[arg(long)]
        link: Option<String>,

        /// Custom User-Agent for article fetches
        #[arg(long)]
        user_agent: Option<String>,

        /// Per-article fetch timeout in seconds
        #[arg(long, default_value_t = 15)]
        timeout: u64,

        /// Articles fetched at once
        #[arg(long, default_value_t = 1)]
        concurrency: usize,

        /// Print status line and headers before the body
        #[arg(long)]
        headers: bool,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            input,
            url,
            title,
            link,
            user_agent,
            timeout,
            concurrency,
            headers,
        } => {
            let json = read_input(input.as_ref()).unwrap_or_else(|e| {
                eprintln!("Error reading input: {}", e);
                std::process::exit(1);
            });

            let mut builder = Feed::builder()
                .timeout(Duration::from_secs(timeout))
                .fetch_concurrency(concurrency);
            if let Some(title) = title {
                builder = builder.title(title);
            }
            if let Some(link) = link {
                builder = builder.link(link);
            }
            if let Some(ua) = user_agent {
                builder = builder.user_agent(ua);
            }
            let feed = builder.build();

            match feed.render_json(&json, &url).await {
                Ok(response) => {
                    if headers {
                        write_safe(format_headers(&response).as_bytes());
                    }
                    write_safe(&response.body);
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }
}

fn read_input(path: Option<&PathBuf>) -> io::Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

/// Status line and headers, HTTP style, followed by a blank line
fn format_headers(response: &FeedResponse) -> String {
    let mut output = format!("HTTP/1.1 {}\n", response.status);
    for (name, value) in &response.headers {
        output.push_str(&format!(
            "{}: {}\n",
            name,
            value.to_str().unwrap_or_default()
        ));
    }
    output.push('\n');
    output
}

/// Write to stdout, exit silently on broken pipe
fn write_safe(bytes: &[u8]) {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if let Err(e) = handle.write_all(bytes).and_then(|_| handle.flush()) {
        if e.kind() == io::ErrorKind::BrokenPipe {
            std::process::exit(0);
        }
        eprintln!("Error writing to stdout: {}", e);
        std::process::exit(1);
    }
}
