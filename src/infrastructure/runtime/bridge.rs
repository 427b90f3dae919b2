//! Runtime bridge - connects sync TUI thread with async Tokio runtime
//!
//! The UI thread owns the view-model and never awaits. Fetches and status
//! writes run on a worker thread with its own Tokio runtime; results come
//! back as [`RuntimeEvent`]s drained once per frame.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use tokio::runtime::Runtime;

use crate::core::FetchTicket;
use crate::domain::{Appointment, AppointmentId, AppointmentStatus};
use crate::infrastructure::provider::AppointmentProvider;
use crate::infrastructure::runtime::worker::run_async_worker;

/// Commands sent from the TUI to the async worker
#[derive(Debug, Clone)]
pub enum RuntimeCommand {
    /// Load the appointment collection for this ticket
    FetchAppointments { ticket: FetchTicket },
    /// Write a status change back to the provider
    PersistStatus {
        id: AppointmentId,
        status: AppointmentStatus,
    },
    /// Shutdown the worker
    Shutdown,
}

/// Events sent from the async worker to the TUI
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    /// Fetch finished; the error is already rendered for display
    AppointmentsLoaded {
        ticket: FetchTicket,
        result: Result<Vec<Appointment>, String>,
    },
    /// Provider accepted a status change
    StatusPersisted {
        id: AppointmentId,
        status: AppointmentStatus,
    },
    /// Provider rejected a status change
    PersistFailed { id: AppointmentId, message: String },
    /// Error occurred
    Error { message: String },
}

/// Bridge between sync TUI thread and async Tokio runtime
pub struct RuntimeBridge {
    cmd_tx: Sender<RuntimeCommand>,
    evt_rx: Receiver<RuntimeEvent>,
}

impl RuntimeBridge {
    /// Spawn the worker thread driving `provider`
    pub fn new(provider: Box<dyn AppointmentProvider>) -> anyhow::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<RuntimeCommand>();
        let (evt_tx, evt_rx) = mpsc::channel::<RuntimeEvent>();
        let rt = Runtime::new()?;

        thread::Builder::new()
            .name("clinic-dash-worker".to_string())
            .spawn(move || {
                rt.block_on(async {
                    if let Err(err) = run_async_worker(provider, cmd_rx, evt_tx.clone()).await {
                        let _ = evt_tx.send(RuntimeEvent::Error {
                            message: format!("Worker exited: {:#}", err),
                        });
                    }
                });
            })?;

        Ok(Self { cmd_tx, evt_rx })
    }

    /// Send a command to the async worker
    pub fn send(&self, cmd: RuntimeCommand) -> anyhow::Result<()> {
        self.cmd_tx
            .send(cmd)
            .map_err(|_| anyhow::anyhow!("Worker channel closed"))
    }

    /// Poll for events (non-blocking)
    pub fn poll_events(&self) -> Vec<RuntimeEvent> {
        let mut events = Vec::new();
        while let Ok(evt) = self.evt_rx.try_recv() {
            events.push(evt);
        }
        events
    }

    /// Wait up to `timeout` for the next event
    pub fn recv_timeout(&self, timeout: std::time::Duration) -> Option<RuntimeEvent> {
        self.evt_rx.recv_timeout(timeout).ok()
    }
}

impl Drop for RuntimeBridge {
    fn drop(&mut self) {
        let _ = self.cmd_tx.send(RuntimeCommand::Shutdown);
    }
}
