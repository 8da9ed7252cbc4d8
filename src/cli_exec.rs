use anyhow::{Context, Result};

use svcdeck::config::Config;
use svcdeck::gateway::{Gateway, GatewayError, HttpTransport};
use svcdeck::model::ControlKey;
use svcdeck::notify::NotificationQueue;
use svcdeck::projection::{self, SortDirection};

use crate::Commands;

/// Runs one non-interactive command. `Ok(false)` means the server call
/// failed and the failure was already reported on stderr.
pub(super) async fn run_command(cfg: &Config, command: Commands) -> Result<bool> {
    let transport = HttpTransport::new(&cfg.base_url, cfg.request_timeout())?;
    let mut queue = NotificationQueue::new();
    let gw = Gateway::new(transport, queue.notifier());

    let ok = match command {
        Commands::Tui => anyhow::bail!("tui is not a one-shot command"),
        Commands::List {
            query,
            sort,
            desc,
            json,
        } => {
            let direction = if desc {
                SortDirection::Descending
            } else {
                SortDirection::Ascending
            };
            match gw.list_services().await {
                Ok(services) => {
                    let rows = projection::project(
                        &services,
                        query.as_deref().unwrap_or(""),
                        sort,
                        direction,
                    );
                    if json {
                        println!(
                            "{}",
                            serde_json::to_string_pretty(&rows).context("serialize services json")?
                        );
                    } else if rows.is_empty() {
                        println!("No services");
                    } else {
                        for r in rows {
                            println!(
                                "{:<40} {:<10} {:<10} {:<10} {:<10} {}",
                                r.unit, r.load, r.active, r.sub, r.enabled, r.description
                            );
                        }
                    }
                    true
                }
                Err(_) => false,
            }
        }
        Commands::Action { unit, action } => {
            run_control(&gw, ControlKey::new(&unit, action)).await
        }
        Commands::DaemonReload => run_control(&gw, ControlKey::daemon_reload()).await,
        Commands::Status { unit } => print_text(gw.status(&unit).await.map(|r| r.text().to_string())),
        Commands::Logs { unit } => print_text(gw.logs(&unit).await.map(|r| r.text().to_string())),
        Commands::Cat { unit } => match gw.read_file(&unit).await {
            Ok(reply) => {
                eprintln!("# {}", reply.path());
                print!("{}", reply.content());
                true
            }
            Err(_) => false,
        },
    };

    queue.collect();
    for n in queue.live() {
        eprintln!("{}: {}", n.kind.label(), n.message);
    }
    Ok(ok)
}

async fn run_control(gw: &Gateway<HttpTransport>, key: ControlKey) -> bool {
    match gw.control(&key).await {
        Ok(reply) => {
            println!("{}", reply.message_or(&format!("{} successful.", key.action)));
            true
        }
        Err(_) => false,
    }
}

fn print_text(result: Result<String, GatewayError>) -> bool {
    match result {
        Ok(text) => {
            println!("{}", text);
            true
        }
        Err(_) => false,
    }
}
