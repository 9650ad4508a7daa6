use tokio::io::{AsyncBufReadExt, BufReader};

use zoom_follow::config::{ConfigStore, JsonConfigStore, TrackingConfig};
use zoom_follow::diagnostics::init_diagnostics;
use zoom_follow::driver::{self, Command};
use zoom_follow::source::{DesktopSource, SourceHandle, SourceKind, TracingSink};
use zoom_follow::zoom::{RegionGeometry, TrackingLoop};

#[tokio::main]
async fn main() {
    let store = JsonConfigStore::default();
    let config = match store.load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            TrackingConfig::default()
        }
    };

    let _guard = init_diagnostics(config.debug);
    tracing::info!("ZoomFollow starting. Config: {:?}", store.path());

    // The console harness tracks the primary monitor at its configured size
    let (width, height) = config
        .region_size_override
        .map(|size| (size.width, size.height))
        .unwrap_or((1920, 1080));
    let source = DesktopSource::new(RegionGeometry::new(0, 0, width, height));

    let mut tracking = TrackingLoop::new(source, TracingSink::default(), config);
    tracking.select_source(Some(SourceHandle::new(
        "Primary monitor",
        SourceKind::Monitor { monitor: None },
    )));

    let (tx, rx) = driver::command_channel();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        println!("Commands: z = zoom, t = track, r = refresh, q = quit");
        while let Ok(Some(line)) = lines.next_line().await {
            let command = match line.trim() {
                "z" => Command::ToggleZoom,
                "t" => Command::ToggleTrack,
                "r" => Command::RefreshGeometry,
                "q" => Command::Shutdown,
                other => {
                    println!("Unknown command: {other}");
                    continue;
                }
            };
            let quit = matches!(command, Command::Shutdown);
            if tx.send(command).await.is_err() || quit {
                break;
            }
        }
    });

    // Driven on the main task so the desktop source need not be Send
    let tracking = driver::run(tracking, rx).await;

    if let Err(e) = store.save_config(tracking.tracker().config()) {
        tracing::warn!("Failed to save config: {e}");
    }
}
