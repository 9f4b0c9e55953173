mod cli;
mod init;
mod term;

use std::{io::IsTerminal, sync::Arc};

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;

use addrsuggest::{
    autocomplete::{self, AutocompleteHandle, Settings, Snapshot},
    client::{HttpSearchClient, Search},
    config,
    render,
};
use cli::Commands;
use term::Command;

#[tokio::main]
async fn main() {
    init::init_logger();

    let cli = cli::Cli::parse();

    match cli.command {
        // Generate a new config file.
        Commands::NewConfig { path } => match config::generate_sample(&path) {
            Ok(_) => {
                log::info!("config file generated: {}", path.display());
            }
            Err(e) => {
                log::error!("error generating config: {}", e);
                std::process::exit(1);
            }
        },

        // One-shot search.
        Commands::Search {
            query,
            page_size,
            json,
        } => {
            let cfg = init::init_config(&cli.config, cli.api_base.as_deref());
            let client = init::init_client(&cfg);
            let page_size = page_size.unwrap_or(cfg.search.page_size);

            if let Err(e) = search_once(&client, &query, page_size, cfg.search.min_chars, json).await {
                log::error!("{}", e);
                std::process::exit(1);
            }
        }

        // Stdin-driven autocomplete session.
        Commands::Interactive => {
            let cfg = init::init_config(&cli.config, cli.api_base.as_deref());
            let client = init::init_client(&cfg);
            interactive(client, Settings::from(&cfg.search)).await;
        }
    }
}

async fn search_once(
    client: &HttpSearchClient,
    query: &str,
    page_size: u32,
    min_chars: usize,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !autocomplete::is_searchable(query, min_chars) {
        if json {
            println!("{}", term::format_json(query, &[])?);
            return Ok(());
        }
        println!("{}", render::empty_hint(query, min_chars));
        return Ok(());
    }

    // Ctrl-C aborts the request.
    let cancel = CancellationToken::new();
    let c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            c.cancel();
        }
    });

    let found = client.search(query, page_size, cancel).await?;
    if json {
        println!("{}", term::format_json(query, &found)?);
        return Ok(());
    }

    if found.is_empty() {
        println!("{}", render::HINT_NO_MATCHES);
        return Ok(());
    }

    let ansi = std::io::stdout().is_terminal();
    for (i, s) in found.iter().enumerate() {
        let row = render::SuggestionRow::new(s, query);
        println!("{}", term::format_row(i + 1, &row, ansi));
    }

    Ok(())
}

async fn interactive(client: Arc<HttpSearchClient>, settings: Settings) {
    let (h, task) = autocomplete::spawn(client, settings);
    let mut state = h.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let ansi = std::io::stdout().is_terminal();

    log::info!(
        "type an address; `:select N` picks a row, `:clear` resets, `:quit` exits"
    );

    loop {
        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    let snap = state.borrow().clone();
                    if !handle_line(&h, &snap, &line) {
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    log::error!("error reading stdin: {}", e);
                    break;
                }
            },

            changed = state.changed() => {
                if changed.is_err() {
                    break;
                }
                let snap = state.borrow_and_update().clone();
                print!("{}", term::format_snapshot(&snap, settings.min_chars, ansi));
            }

            _ = tokio::signal::ctrl_c() => break,
        }
    }

    h.shutdown();
    if let Err(e) = task.await {
        log::error!("autocomplete task failed: {}", e);
    }
}

/// Apply one line of input. Returns false when the session should end.
fn handle_line(h: &AutocompleteHandle, snap: &Snapshot, line: &str) -> bool {
    let res = match term::parse_command(line) {
        Command::Input(text) => h.set_input(text),

        Command::Select(n) => {
            match term::pick_row(snap, n) {
                // Choosing a row also puts its label in the input.
                Some(s) => {
                    let label = s.label().to_string();
                    h.select(Some(s)).and_then(|_| h.set_input(label))
                }
                None => {
                    log::warn!("no row {}", n);
                    Ok(())
                }
            }
        }

        Command::Clear => h.select(None).and_then(|_| h.set_input("")),

        Command::Quit => return false,

        Command::Invalid(msg) => {
            log::warn!("{}", msg);
            Ok(())
        }
    };

    res.is_ok()
}
