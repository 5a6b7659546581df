use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Context as _;
use clap::Parser;
use crossterm::event::{Event as TermEvent, EventStream};
use futures::StreamExt;
use inventory_console::config::ServerConfig;
use inventory_console::{Config, HttpInventoryClient, InventoryApi};
use inventory_tui::event::{Action, BackendEvent, Event};
use inventory_tui::{App, Tui};
use tokio::sync::mpsc::{UnboundedSender, unbounded_channel};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "inventory-tui")]
#[command(about = "Terminal console for an inventory service")]
#[command(version)]
struct Args {
    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Inventory base URL (e.g., http://localhost:8080/hawkular/inventory)
    #[arg(short, long)]
    server: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(server) = &args.server {
        let timeout_secs = config.server.timeout_secs;
        config.server = ServerConfig {
            timeout_secs,
            ..ServerConfig::from_url(server)?
        };
    }
    init_logging(&config.console.data_dir)?;

    let client = HttpInventoryClient::new(&config.server)?;
    let app = App::new(client.base_url().to_string(), &config);
    let api: Arc<dyn InventoryApi> = Arc::new(client);

    let mut tui = Tui::new()?;
    tui.enter()?;
    let result = run(&mut tui, app, api).await;
    tui.exit()?;
    result
}

/// Log to a file under the data dir so output does not corrupt the screen
fn init_logging(data_dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create {}", data_dir.display()))?;
    let log_path = data_dir.join("inventory-tui.log");
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,inventory_console=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}

async fn run(tui: &mut Tui, mut app: App, api: Arc<dyn InventoryApi>) -> anyhow::Result<()> {
    let (tx, mut rx) = unbounded_channel::<BackendEvent>();
    let mut terminal_events = EventStream::new();
    let mut ticks = tokio::time::interval(Duration::from_millis(250));

    for action in app.startup() {
        dispatch(action, &api, &tx);
    }

    while !app.should_quit {
        tui.draw(&mut app)?;

        let event = tokio::select! {
            _ = ticks.tick() => Event::Tick,
            Some(backend) = rx.recv() => Event::Backend(backend),
            maybe_event = terminal_events.next() => match maybe_event {
                Some(Ok(TermEvent::Key(key))) => Event::Key(key),
                Some(Ok(TermEvent::Resize(w, h))) => Event::Resize(w, h),
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(e.into()),
                None => break,
            },
        };

        let actions = match event {
            Event::Key(key) => app.on_key(key),
            Event::Backend(backend) => app.on_backend(backend),
            Event::Tick => {
                app.on_tick();
                Vec::new()
            }
            Event::Resize(_, _) => Vec::new(),
        };
        for action in actions {
            dispatch(action, &api, &tx);
        }
    }

    Ok(())
}

/// Run `action` on a background task and post its result to the event loop
fn dispatch(action: Action, api: &Arc<dyn InventoryApi>, tx: &UnboundedSender<BackendEvent>) {
    let api = Arc::clone(api);
    let tx = tx.clone();
    tracing::debug!("Dispatching {:?}", action);

    tokio::spawn(async move {
        let event = match action {
            Action::LoadRoots(ticket) => BackendEvent::Roots {
                ticket,
                result: api.root_resources().await,
            },
            Action::Expand(ticket) => {
                let result = api.children(ticket.resource_id()).await;
                BackendEvent::Children { ticket, result }
            }
            Action::LoadTypes(ticket) => BackendEvent::Types {
                ticket,
                result: api.resource_types().await,
            },
            Action::DeleteResource(resource) => {
                let result = api.delete_resource(&resource.id).await;
                BackendEvent::ResourceDeleted { resource, result }
            }
            Action::DeleteType(type_id) => {
                let result = api.delete_resource_type(&type_id).await;
                BackendEvent::TypeDeleted { type_id, result }
            }
            Action::CheckStatus => BackendEvent::Status(api.status().await),
        };
        // The receiver is gone only when the app is shutting down
        let _ = tx.send(event);
    });
}
