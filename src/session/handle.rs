//! Single-writer session task
//!
//! Tracking events arrive on the provider's capture thread while scatter and
//! clear come from the UI. Both go through one channel into the task that
//! owns the `PlacementSession`, so every mutation is applied in arrival
//! order and side effects are issued after the mutation that caused them.

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use super::collaborators::{SceneRenderer, TrackingProvider};
use super::controller::{PlacementReport, PlacementSession, ScanStatus};
use crate::error::{SessionError, SessionResult};
use crate::surface::{Decision, PlacedObject, SurfaceRecord, TrackingEvent};

enum Command<R, P> {
    Start,
    Stop,
    Track {
        event: TrackingEvent,
        reply: Option<oneshot::Sender<Decision>>,
    },
    Scatter(oneshot::Sender<SessionResult<PlacementReport>>),
    Clear,
    Reset,
    Snapshot(oneshot::Sender<Snapshot>),
    Shutdown(oneshot::Sender<PlacementSession<R, P>>),
}

/// Point-in-time copy of the session's observable state
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub status: ScanStatus,
    pub accepted: Vec<SurfaceRecord>,
    pub placed: Vec<PlacedObject>,
}

/// Cloneable handle to a session running in its own task
pub struct SessionHandle<R, P> {
    sender: mpsc::UnboundedSender<Command<R, P>>,
}

impl<R, P> Clone for SessionHandle<R, P> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<R, P> SessionHandle<R, P>
where
    R: SceneRenderer + Send + 'static,
    P: TrackingProvider + Send + 'static,
{
    /// Move `session` into a new task on the current tokio runtime
    pub fn spawn(session: PlacementSession<R, P>) -> (Self, JoinHandle<()>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(session, receiver));
        (Self { sender }, task)
    }

    fn send(&self, command: Command<R, P>) -> SessionResult<()> {
        self.sender
            .send(command)
            .map_err(|_| SessionError::Disconnected)
    }

    pub fn start_scanning(&self) -> SessionResult<()> {
        self.send(Command::Start)
    }

    pub fn stop_scanning(&self) -> SessionResult<()> {
        self.send(Command::Stop)
    }

    /// Queue a tracking event without waiting (for the capture thread)
    pub fn submit(&self, event: TrackingEvent) -> SessionResult<()> {
        self.send(Command::Track { event, reply: None })
    }

    /// Apply a tracking event and wait for the decision
    pub async fn track(&self, event: TrackingEvent) -> SessionResult<Decision> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Track {
            event,
            reply: Some(reply),
        })?;
        response.await.map_err(|_| SessionError::Disconnected)
    }

    pub async fn scatter(&self) -> SessionResult<PlacementReport> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Scatter(reply))?;
        response.await.map_err(|_| SessionError::Disconnected)?
    }

    pub fn clear(&self) -> SessionResult<()> {
        self.send(Command::Clear)
    }

    pub fn reset(&self) -> SessionResult<()> {
        self.send(Command::Reset)
    }

    /// Observable state after every previously queued command
    pub async fn snapshot(&self) -> SessionResult<Snapshot> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Snapshot(reply))?;
        response.await.map_err(|_| SessionError::Disconnected)
    }

    /// Stop the task once queued commands are processed and take the session back
    pub async fn shutdown(self) -> SessionResult<PlacementSession<R, P>> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Shutdown(reply))?;
        response.await.map_err(|_| SessionError::Disconnected)
    }
}

async fn run<R, P>(
    mut session: PlacementSession<R, P>,
    mut receiver: mpsc::UnboundedReceiver<Command<R, P>>,
) where
    R: SceneRenderer,
    P: TrackingProvider,
{
    while let Some(command) = receiver.recv().await {
        match command {
            Command::Start => session.start_scanning(),
            Command::Stop => session.stop_scanning(),
            Command::Track { event, reply } => {
                let decision = session.on_tracking_event(event);
                if let Some(reply) = reply {
                    let _ = reply.send(decision);
                }
            }
            Command::Scatter(reply) => {
                let _ = reply.send(session.scatter());
            }
            Command::Clear => session.clear(),
            Command::Reset => session.reset(),
            Command::Snapshot(reply) => {
                let _ = reply.send(Snapshot {
                    status: session.status(),
                    accepted: session.accepted().to_vec(),
                    placed: session.placed().to_vec(),
                });
            }
            Command::Shutdown(reply) => {
                let _ = reply.send(session);
                return;
            }
        }
    }
    log::debug!("Session task stopped, all handles dropped");
}
