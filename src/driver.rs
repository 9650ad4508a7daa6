//! Async driver: owns the tick subscription and applies host commands
//!
//! Commands arrive over an mpsc channel (hotkeys, a settings surface, a
//! console). Between events the driver keeps its [`Ticker`] in step with the
//! loop's [`TickState`], so the interval only exists while something is
//! animating or following.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{Interval, MissedTickBehavior};

use crate::config::TrackingConfig;
use crate::source::{CropSink, SourceHandle, SourceProvider};
use crate::zoom::{TickState, TrackingLoop};

const COMMAND_BUFFER: usize = 32;

/// Requests from the host to the tracking loop
#[derive(Debug, Clone)]
pub enum Command {
    ToggleZoom,
    ToggleTrack,
    SelectSource(Option<SourceHandle>),
    RefreshGeometry,
    UpdateConfig(TrackingConfig),
    Shutdown,
}

pub fn command_channel() -> (mpsc::Sender<Command>, mpsc::Receiver<Command>) {
    mpsc::channel(COMMAND_BUFFER)
}

/// Optional periodic interval; subscribe/unsubscribe are idempotent
#[derive(Debug, Default)]
pub struct Ticker {
    interval: Option<Interval>,
}

impl Ticker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_subscribed(&self) -> bool {
        self.interval.is_some()
    }

    /// Start ticking every `period`. No-op when already ticking at that
    /// period; a different period replaces the interval.
    pub fn subscribe(&mut self, period: Duration) -> bool {
        if let Some(interval) = &self.interval {
            if interval.period() == period {
                return false;
            }
        }

        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        self.interval = Some(interval);
        true
    }

    pub fn unsubscribe(&mut self) -> bool {
        self.interval.take().is_some()
    }

    /// Wait for the next tick; pends forever while unsubscribed
    pub async fn tick(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }
}

/// Run the tracking loop until `Shutdown` or until every sender is dropped,
/// then hand the loop back
pub async fn run<S, K>(
    mut tracking: TrackingLoop<S, K>,
    mut commands: mpsc::Receiver<Command>,
) -> TrackingLoop<S, K>
where
    S: SourceProvider,
    K: CropSink,
{
    let mut ticker = Ticker::new();

    loop {
        sync_ticker(&tracking, &mut ticker);

        tokio::select! {
            command = commands.recv() => match command {
                Some(Command::Shutdown) | None => break,
                Some(command) => apply(&mut tracking, command),
            },
            _ = ticker.tick() => {
                tracking.tick();
            }
        }
    }

    tracing::info!("Tracking driver stopped");
    tracking
}

fn sync_ticker<S, K>(tracking: &TrackingLoop<S, K>, ticker: &mut Ticker)
where
    S: SourceProvider,
    K: CropSink,
{
    match tracking.tick_state() {
        TickState::Ticking => {
            let period = Duration::from_millis(tracking.frame_interval_ms().max(1));
            if ticker.subscribe(period) {
                tracing::debug!("Ticking every {:?}", period);
            }
        }
        TickState::Idle => {
            if ticker.unsubscribe() {
                tracing::debug!("Ticking stopped");
            }
        }
    }
}

fn apply<S, K>(tracking: &mut TrackingLoop<S, K>, command: Command)
where
    S: SourceProvider,
    K: CropSink,
{
    tracing::debug!(?command, "command");
    match command {
        Command::ToggleZoom => tracking.toggle_zoom(),
        Command::ToggleTrack => tracking.toggle_track(),
        Command::SelectSource(handle) => tracking.select_source(handle),
        Command::RefreshGeometry => {
            if let Err(e) = tracking.refresh_geometry() {
                tracing::debug!("Refresh left the region unresolved: {e}");
            }
        }
        Command::UpdateConfig(config) => tracking.set_config(config),
        Command::Shutdown => {}
    }
}
