//! Shared test infrastructure for cowatch-client integration tests
//!
//! Provides scripted stand-ins for the two embedder-supplied seams:
//! - FakeSurface: media surface recording every issued command
//! - RecordingBus: transport capturing every outbound message

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use cowatch_client::bus::EventBus;
use cowatch_client::error::{Error, Result};
use cowatch_client::surface::MediaSurface;
use cowatch_common::{ClientMessage, VideoId};

/// A command the reconciler issued to the surface
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCommand {
    Load { video: VideoId, start: f64 },
    Play,
    Pause,
    Seek { time: f64 },
}

#[derive(Default)]
struct SurfaceInner {
    ready: bool,
    video: Option<VideoId>,
    time: Option<f64>,
    commands: Vec<SurfaceCommand>,
    fail_commands: bool,
}

/// Scriptable media surface
///
/// Starts not ready; tests flip readiness, position, and failure mode as
/// the scenario demands and inspect the recorded command stream.
pub struct FakeSurface {
    inner: Mutex<SurfaceInner>,
}

impl FakeSurface {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(SurfaceInner::default()),
        })
    }

    /// A surface that is ready from the start
    pub fn ready() -> Arc<Self> {
        let surface = Self::new();
        surface.make_ready();
        surface
    }

    pub fn make_ready(&self) {
        self.inner.lock().unwrap().ready = true;
    }

    /// Script the position the player would report
    pub fn set_position(&self, time: f64) {
        self.inner.lock().unwrap().time = Some(time);
    }

    /// Make every subsequent command return an error
    pub fn fail_commands(&self) {
        self.inner.lock().unwrap().fail_commands = true;
    }

    pub fn commands(&self) -> Vec<SurfaceCommand> {
        self.inner.lock().unwrap().commands.clone()
    }

    /// Take and clear the recorded commands
    pub fn drain_commands(&self) -> Vec<SurfaceCommand> {
        std::mem::take(&mut self.inner.lock().unwrap().commands)
    }
}

impl MediaSurface for FakeSurface {
    fn is_ready(&self) -> bool {
        self.inner.lock().unwrap().ready
    }

    fn load(&self, video: &VideoId, start: f64) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_commands {
            return Err(Error::Surface("scripted load failure".to_string()));
        }
        inner.commands.push(SurfaceCommand::Load {
            video: video.clone(),
            start,
        });
        inner.video = Some(video.clone());
        inner.time = Some(start);
        Ok(())
    }

    fn play(&self) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_commands {
            return Err(Error::Surface("scripted play failure".to_string()));
        }
        inner.commands.push(SurfaceCommand::Play);
        Ok(())
    }

    fn pause(&self) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_commands {
            return Err(Error::Surface("scripted pause failure".to_string()));
        }
        inner.commands.push(SurfaceCommand::Pause);
        Ok(())
    }

    fn seek(&self, time: f64) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_commands {
            return Err(Error::Surface("scripted seek failure".to_string()));
        }
        inner.commands.push(SurfaceCommand::Seek { time });
        inner.time = Some(time);
        Ok(())
    }

    fn current_video(&self) -> Option<VideoId> {
        self.inner.lock().unwrap().video.clone()
    }

    fn current_time(&self) -> Option<f64> {
        self.inner.lock().unwrap().time
    }
}

#[derive(Default)]
struct BusInner {
    sent: Vec<ClientMessage>,
    failing: bool,
}

/// Transport stand-in capturing every outbound message
pub struct RecordingBus {
    inner: Mutex<BusInner>,
}

impl RecordingBus {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(BusInner::default()),
        })
    }

    /// Make sends fail, as a disconnected transport would
    pub fn set_failing(&self, failing: bool) {
        self.inner.lock().unwrap().failing = failing;
    }

    pub fn sent(&self) -> Vec<ClientMessage> {
        self.inner.lock().unwrap().sent.clone()
    }

    /// Take and clear the recorded messages
    pub fn drain(&self) -> Vec<ClientMessage> {
        std::mem::take(&mut self.inner.lock().unwrap().sent)
    }
}

impl EventBus for RecordingBus {
    fn send(&self, message: &ClientMessage) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        if inner.failing {
            return Err(Error::Bus("scripted send failure".to_string()));
        }
        inner.sent.push(message.clone());
        Ok(())
    }
}

/// Initialize test logging once; later calls are no-ops
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .with_test_writer()
        .try_init();
}
