//! Interactive player session
//!
//! Owns the controller for the lifetime of the shell and turns commands
//! into controller calls plus printable output.

use crate::command::{format_ms, Command, SeekTarget, HELP};
use crate::config::CliConfig;
use crate::error::{CliError, Result};
use itired_client::{ClientConfig, ItiredClient};
use itired_playback::{
    CatalogResolver, JsonFileStore, PlayerController, PlayerError, PlayerEvent, ResolvedTrack,
    SimulatedTransport, TrackId, TrackRef, TrackResolver,
};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// What a command produced
#[derive(Debug, Default, PartialEq)]
pub struct Reply {
    pub lines: Vec<String>,
    pub quit: bool,
}

impl Reply {
    fn line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }
}

/// Offline catalogue entry
#[derive(Debug, Deserialize)]
struct CatalogEntry {
    service: String,
    track_id: String,
    #[serde(flatten)]
    track: ResolvedTrack,
}

fn read_catalog(path: &Path) -> Result<Vec<CatalogEntry>> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn catalog_resolver(entries: &[CatalogEntry]) -> CatalogResolver {
    let mut catalog = CatalogResolver::new();
    for entry in entries {
        catalog.insert(
            TrackRef::new(entry.service.as_str(), entry.track_id.as_str()),
            entry.track.clone(),
        );
    }
    catalog
}

pub struct Session {
    player: PlayerController<SimulatedTransport>,
    client: Option<ItiredClient>,
}

impl Session {
    pub fn new(player: PlayerController<SimulatedTransport>, client: Option<ItiredClient>) -> Self {
        Self { player, client }
    }

    /// Build the session described by `config`
    ///
    /// Online sessions resolve through the platform; offline ones through
    /// the configured catalogue (empty if none).
    pub fn from_config(config: &CliConfig) -> Result<Self> {
        let store = JsonFileStore::open(&config.storage.store_path, config.player.history_limit)?;

        let (resolver, client, transport) =
            match config.server.url {
                Some(ref url) => {
                    let client = ItiredClient::new(ClientConfig {
                        url: url.clone(),
                        session_cookie: config.server.session_cookie.clone(),
                    })?;
                    info!(url = %url, "Online session");
                    let resolver: Arc<dyn TrackResolver> = Arc::new(client.clone());
                    (resolver, Some(client), SimulatedTransport::new())
                }
                None => {
                    let entries = match config.storage.catalog_path {
                        Some(ref path) => read_catalog(path)?,
                        None => Vec::new(),
                    };
                    // Offline media plays for exactly its catalogued length
                    let transport = entries.iter().fold(SimulatedTransport::new(), |t, e| {
                        t.with_duration(e.track.url.as_str(), e.track.duration_ms)
                    });
                    let catalog = catalog_resolver(&entries);
                    info!(tracks = catalog.len(), "Offline session");
                    let resolver: Arc<dyn TrackResolver> = Arc::new(catalog);
                    (resolver, None, transport)
                }
            };

        let player = PlayerController::new(
            transport,
            resolver,
            Box::new(store),
            config.player.clone(),
        );
        Ok(Self::new(player, client))
    }

    pub fn player(&self) -> &PlayerController<SimulatedTransport> {
        &self.player
    }

    /// End the session, stopping playback
    pub fn dispose(self) {
        self.player.dispose();
    }

    /// Run one command
    pub async fn execute(&mut self, command: Command) -> Result<Reply> {
        let mut reply = Reply::default();

        match command {
            Command::Play(reference) => {
                let result = self
                    .player
                    .play_track(&reference.service, &reference.track_id)
                    .await;
                Self::report(result)?;
            }
            Command::Playlist(reference) => {
                let client = self.client.as_ref().ok_or(CliError::Offline)?;
                let playlist = client
                    .catalog()
                    .playlist(&reference.service, &reference.track_id)
                    .await?;
                let added = self.player.enqueue_resolved(&playlist.references()).await;
                reply.line(format!(
                    "Queued {} of {} tracks from '{}'",
                    added,
                    playlist.tracks.len(),
                    playlist.title
                ));
            }
            Command::Liked => {
                let client = self.client.as_ref().ok_or(CliError::Offline)?;
                let liked = client.catalog().liked().await?;
                let references: Vec<TrackRef> =
                    liked.iter().filter_map(|t| t.reference()).collect();
                let added = self.player.enqueue_resolved(&references).await;
                reply.line(format!("Queued {} of {} liked tracks", added, liked.len()));
            }
            Command::Next => Self::report(self.player.next_track())?,
            Command::Prev => Self::report(self.player.prev_track())?,
            Command::Toggle => Self::report(self.player.toggle_play())?,
            Command::Shuffle => {
                let on = self.player.toggle_shuffle();
                reply.line(format!("Shuffle {}", if on { "on" } else { "off" }));
            }
            Command::Repeat(mode) => {
                let mode = match mode {
                    Some(mode) => {
                        self.player.set_repeat(mode);
                        mode
                    }
                    None => self.player.toggle_repeat(),
                };
                reply.line(format!("Repeat: {:?}", mode));
            }
            Command::Volume(percent) => {
                let level = self.player.set_volume(percent / 100.0);
                reply.line(format!("Volume: {}%", (level * 100.0).round()));
            }
            Command::Mute => {
                let muted = self.player.toggle_mute();
                reply.line(if muted { "Muted" } else { "Unmuted" });
            }
            Command::Seek(target) => {
                match target {
                    SeekTarget::Position(ms) => self.player.seek_to(ms),
                    SeekTarget::Fraction(fraction) => self.player.seek_to_percent(fraction),
                }
                reply.line(self.progress());
            }
            Command::Queue => self.render_queue(&mut reply),
            Command::Jump(index) => Self::report(self.player.skip_to(index))?,
            Command::Remove(index) => {
                let removed = self.player.remove_from_queue(index)?;
                reply.line(format!("Removed {}", removed.title));
            }
            Command::Clear => {
                self.player.clear_queue();
                reply.line("Queue cleared");
            }
            Command::History => self.render_history(&mut reply),
            Command::Tick(ms) => {
                let result = self.player.drive_transport(|t| t.advance(ms));
                Self::report(result)?;
            }
            Command::Status => self.render_status(&mut reply),
            Command::Health => {
                let client = self.client.as_ref().ok_or(CliError::Offline)?;
                let health = client.health().await?;
                reply.line(format!("Platform: {}", health.status));
            }
            Command::Login(cookie) => {
                let client = self.client.as_ref().ok_or(CliError::Offline)?;
                client.set_session_cookie(cookie).await;
                reply.line("Session set");
            }
            Command::Logout => {
                let client = self.client.as_ref().ok_or(CliError::Offline)?;
                client.clear_session().await;
                reply.line("Signed out");
            }
            Command::Help => reply.lines.extend(HELP.lines().map(String::from)),
            Command::Quit => reply.quit = true,
        }

        Self::report(self.player.pump_transport_events())?;
        self.render_events(&mut reply);
        Ok(reply)
    }

    /// Resolution and playback failures arrive as notifications; the rest
    /// are real errors
    fn report<T>(result: itired_playback::Result<T>) -> Result<()> {
        match result {
            Ok(_) | Err(PlayerError::Resolution(_) | PlayerError::Playback(_)) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn render_events(&mut self, reply: &mut Reply) {
        for event in self.player.drain_events() {
            match event {
                PlayerEvent::TrackChanged { track_id, .. } => {
                    reply.line(format!("Now playing: {}", self.describe(&track_id)));
                }
                PlayerEvent::Notification { message } => reply.line(format!("! {}", message)),
                other => debug!(event = ?other, "Player event"),
            }
        }
    }

    fn describe(&self, track_id: &TrackId) -> String {
        self.player
            .current_track()
            .into_iter()
            .chain(self.player.queue().iter())
            .find(|t| &t.id == track_id)
            .map(|t| format!("{} - {}", t.artist_line(), t.title))
            .unwrap_or_else(|| track_id.to_string())
    }

    fn progress(&self) -> String {
        let state = self.player.state();
        format!(
            "[{} / {}]",
            format_ms(state.position_ms),
            format_ms(state.duration_ms)
        )
    }

    fn render_status(&self, reply: &mut Reply) {
        let state = self.player.state();

        match self.player.current_track() {
            Some(track) => reply.line(format!(
                "{} {} - {} {}",
                if state.is_playing { ">" } else { "||" },
                track.artist_line(),
                track.title,
                self.progress()
            )),
            None => reply.line("Nothing loaded"),
        }

        reply.line(format!(
            "volume {}%{} | repeat {:?} | shuffle {} | queue {}",
            (state.volume * 100.0).round(),
            if state.muted { " (muted)" } else { "" },
            state.repeat_mode,
            if state.shuffled { "on" } else { "off" },
            self.player.queue_len()
        ));
    }

    fn render_queue(&self, reply: &mut Reply) {
        let queue = self.player.queue();
        if queue.is_empty() {
            reply.line("Queue is empty");
            return;
        }

        let current = self.player.current_index();
        for (index, track) in queue.iter().enumerate() {
            reply.line(format!(
                "{} {:>3}. {} - {} ({})",
                if current == Some(index) { ">" } else { " " },
                index + 1,
                track.artist_line(),
                track.title,
                format_ms(track.duration_ms)
            ));
        }
    }

    fn render_history(&self, reply: &mut Reply) {
        let history = self.player.history();
        if history.is_empty() {
            reply.line("Nothing played yet");
            return;
        }

        for entry in history {
            reply.line(format!(
                "{}  {} - {}",
                entry.played_at.format("%Y-%m-%d %H:%M"),
                entry.artists.join(", "),
                entry.title
            ));
        }
    }
}
