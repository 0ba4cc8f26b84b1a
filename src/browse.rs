//! Interactive terminal client.
//!
//! Loads the default query on start, then reads one search term per line.
//! Blank lines are ignored. Each non-blank line issues one proxy request in
//! the background; the page is re-rendered as each request finishes.

use crate::cli::BrowseArgs;
use crate::feed::{NewsFeed, ProxyClient};
use crate::page::{SearchController, SearchPage};
use crate::render::render_text;
use std::error::Error;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, info, instrument, warn};

const PROMPT: &str = "Buscar> ";

#[instrument(level = "info", skip_all, fields(server = %args.server))]
pub async fn run(args: BrowseArgs) -> Result<(), Box<dyn Error>> {
    let client = ProxyClient::new(&args.server)?;
    let controller = SearchController::new(client, SearchPage::new(args.default_query));

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    session(&controller, stdin, &mut stdout).await?;

    info!("Browse session finished");
    Ok(())
}

/// Run the load/prompt/search loop until `input` is exhausted.
///
/// Each search runs in the background, so a new line can be typed while an
/// earlier search is still in flight. The page is re-rendered whenever a
/// search finishes; searches still running at end of input are awaited and
/// rendered once.
pub async fn session<F, R, W>(
    controller: &SearchController<F>,
    input: R,
    out: &mut W,
) -> std::io::Result<()>
where
    F: NewsFeed + 'static,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    controller.load_initial().await;
    write!(out, "{}", render_text(&controller.snapshot().await))?;
    write!(out, "{PROMPT}")?;
    out.flush()?;

    let mut in_flight = JoinSet::new();
    let mut lines = input.lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    writeln!(out)?;
                    break;
                };
                match controller.spawn_search(&line).await {
                    Some(handle) => {
                        in_flight.spawn(handle);
                    }
                    None => debug!("Blank search ignored"),
                }
                write!(out, "{PROMPT}")?;
                out.flush()?;
            }
            Some(joined) = in_flight.join_next() => {
                log_join(joined);
                write!(out, "{}", render_text(&controller.snapshot().await))?;
                out.flush()?;
            }
        }
    }

    if !in_flight.is_empty() {
        while let Some(joined) = in_flight.join_next().await {
            log_join(joined);
        }
        write!(out, "{}", render_text(&controller.snapshot().await))?;
    }
    Ok(())
}

fn log_join(joined: Result<Result<(), JoinError>, JoinError>) {
    if let Err(e) = joined.and_then(|inner| inner) {
        warn!(error = %e, "Search task failed");
    }
}
