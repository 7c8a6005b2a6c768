//! Shell commands
//!
//! One command per input line, whitespace separated.

use crate::error::{CliError, Result};
use itired_playback::{RepeatMode, TrackRef};
use std::str::FromStr;

/// Where `seek` should jump
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SeekTarget {
    /// Absolute position in milliseconds
    Position(u64),
    /// Fraction of the track (0.0-1.0)
    Fraction(f32),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Resolve and play `<service>_<id>`
    Play(TrackRef),
    /// Queue a platform playlist
    Playlist(TrackRef),
    /// Queue the liked tracks
    Liked,
    Next,
    Prev,
    Toggle,
    Shuffle,
    /// Cycle, or set a specific mode
    Repeat(Option<RepeatMode>),
    /// Volume in percent (0-100)
    Volume(f32),
    Mute,
    Seek(SeekTarget),
    Queue,
    Jump(usize),
    Remove(usize),
    Clear,
    History,
    /// Let simulated time pass (milliseconds)
    Tick(u64),
    Status,
    Health,
    /// Use a browser session cookie from now on
    Login(String),
    Logout,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = CliError;

    fn from_str(line: &str) -> Result<Self> {
        let mut parts = line.split_whitespace();
        let Some(name) = parts.next() else {
            return Err(CliError::Command("empty input".to_string()));
        };
        let arg = parts.next();

        if parts.next().is_some() {
            return Err(CliError::Command(format!("too many arguments to '{}'", name)));
        }

        let command = match (name.to_lowercase().as_str(), arg) {
            ("play" | "p", Some(id)) => Command::Play(parse_ref(id)?),
            ("playlist", Some(id)) => Command::Playlist(parse_ref(id)?),
            ("liked", None) => Command::Liked,
            ("next" | "n", None) => Command::Next,
            ("prev" | "previous", None) => Command::Prev,
            ("toggle" | "pause" | "t", None) => Command::Toggle,
            ("shuffle", None) => Command::Shuffle,
            ("repeat", None) => Command::Repeat(None),
            ("repeat", Some(mode)) => Command::Repeat(Some(parse_repeat(mode)?)),
            ("vol" | "volume", Some(value)) => Command::Volume(parse_number(value)?),
            ("mute", None) => Command::Mute,
            ("seek", Some(target)) => Command::Seek(parse_seek(target)?),
            ("queue" | "q", None) => Command::Queue,
            ("jump", Some(index)) => Command::Jump(parse_position(index)?),
            ("remove" | "rm", Some(index)) => Command::Remove(parse_position(index)?),
            ("clear", None) => Command::Clear,
            ("history", None) => Command::History,
            ("tick", None) => Command::Tick(1_000),
            ("tick", Some(value)) => Command::Tick(parse_duration(value)?),
            ("status" | "s", None) => Command::Status,
            ("health", None) => Command::Health,
            ("session" | "login", Some(cookie)) => Command::Login(cookie.to_string()),
            ("logout", None) => Command::Logout,
            ("help" | "?", None) => Command::Help,
            ("quit" | "exit", None) => Command::Quit,
            (other, _) => {
                return Err(CliError::Command(format!(
                    "unknown command or wrong arguments: '{}' (try 'help')",
                    other
                )))
            }
        };
        Ok(command)
    }
}

pub const HELP: &str = "\
play <service>_<id>     resolve and play a track
playlist <service>_<id> queue a platform playlist
liked                   queue liked tracks
next | prev             skip forward / back
toggle                  play / pause
shuffle                 toggle shuffle
repeat [none|one|all]   cycle or set repeat mode
vol <0-100>             set volume
mute                    toggle mute
seek <m:ss|secs|N%>     seek in the current track
queue                   show the queue
jump <n> | remove <n>   play / remove queue entry n (1-based)
clear                   empty the queue
history                 recently played
tick [m:ss|secs]        let playback time pass (default 1s)
status                  show player state
health                  check the platform
session <cookie>        sign in with a browser session cookie
logout                  forget the session
quit";

fn parse_ref(composite: &str) -> Result<TrackRef> {
    TrackRef::parse(composite).ok_or_else(|| {
        CliError::Command(format!(
            "expected <service>_<id>, got '{}'",
            composite
        ))
    })
}

fn parse_repeat(mode: &str) -> Result<RepeatMode> {
    match mode.to_lowercase().as_str() {
        "none" | "off" => Ok(RepeatMode::None),
        "one" => Ok(RepeatMode::One),
        "all" => Ok(RepeatMode::All),
        other => Err(CliError::Command(format!("unknown repeat mode '{}'", other))),
    }
}

fn parse_number(value: &str) -> Result<f32> {
    value
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| CliError::Command(format!("not a number: '{}'", value)))
}

/// 1-based queue position to index
fn parse_position(value: &str) -> Result<usize> {
    match value.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n - 1),
        _ => Err(CliError::Command(format!(
            "expected a queue position (1, 2, ...), got '{}'",
            value
        ))),
    }
}

/// `m:ss` or whole seconds, to milliseconds
fn parse_duration(value: &str) -> Result<u64> {
    let invalid = || CliError::Command(format!("expected m:ss or seconds, got '{}'", value));

    let seconds = match value.split_once(':') {
        Some((minutes, seconds)) => {
            let minutes: u64 = minutes.parse().map_err(|_| invalid())?;
            let seconds: u64 = seconds.parse().map_err(|_| invalid())?;
            if seconds >= 60 {
                return Err(invalid());
            }
            minutes
                .checked_mul(60)
                .and_then(|m| m.checked_add(seconds))
                .ok_or_else(too_long)?
        }
        None => value.parse().map_err(|_| invalid())?,
    };
    seconds.checked_mul(1000).ok_or_else(too_long)
}

fn too_long() -> CliError {
    CliError::Command("duration is too long".to_string())
}

fn parse_seek(value: &str) -> Result<SeekTarget> {
    match value.strip_suffix('%') {
        Some(percent) => Ok(SeekTarget::Fraction(parse_number(percent)? / 100.0)),
        None => parse_duration(value).map(SeekTarget::Position),
    }
}

/// Render milliseconds as `m:ss`
pub fn format_ms(ms: u64) -> String {
    let total = ms / 1000;
    format!("{}:{:02}", total / 60, total % 60)
}
