//! Async worker - runs in Tokio runtime and talks to the appointment provider

use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc::{unbounded_channel, UnboundedSender};
use tokio::time::interval;

use crate::domain::{AppointmentId, AppointmentStatus};
use crate::infrastructure::provider::AppointmentProvider;
use crate::infrastructure::runtime::bridge::{RuntimeCommand, RuntimeEvent};

/// Run the async worker loop until `Shutdown` or the command channel closes
pub async fn run_async_worker(
    provider: Box<dyn AppointmentProvider>,
    cmd_rx: Receiver<RuntimeCommand>,
    evt_tx: Sender<RuntimeEvent>,
) -> Result<()> {
    let provider: Arc<dyn AppointmentProvider> = Arc::from(provider);
    tracing::info!(source = %provider.source_name(), "worker started");

    let persist_tx = spawn_persist_writer(Arc::clone(&provider), evt_tx.clone());
    let mut poll_interval = interval(Duration::from_millis(25));

    loop {
        // Process commands (non-blocking)
        loop {
            let cmd = match cmd_rx.try_recv() {
                Ok(cmd) => cmd,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => return Ok(()),
            };
            match cmd {
                RuntimeCommand::Shutdown => {
                    tracing::info!("worker shutting down");
                    return Ok(());
                }

                RuntimeCommand::FetchAppointments { ticket } => {
                    let provider = Arc::clone(&provider);
                    let evt_tx = evt_tx.clone();
                    tokio::spawn(async move {
                        let result = provider
                            .fetch_appointments()
                            .await
                            .map_err(|err| format!("{:#}", err));
                        let _ = evt_tx.send(RuntimeEvent::AppointmentsLoaded { ticket, result });
                    });
                }

                RuntimeCommand::PersistStatus { id, status } => {
                    if persist_tx.send((id, status)).is_err() {
                        tracing::warn!(%id, "persist writer stopped");
                    }
                }
            }
        }

        poll_interval.tick().await;
    }
}

/// Status writes go through one task so the provider sees them in the order
/// they were issued
fn spawn_persist_writer(
    provider: Arc<dyn AppointmentProvider>,
    evt_tx: Sender<RuntimeEvent>,
) -> UnboundedSender<(AppointmentId, AppointmentStatus)> {
    let (tx, mut rx) = unbounded_channel::<(AppointmentId, AppointmentStatus)>();
    tokio::spawn(async move {
        while let Some((id, status)) = rx.recv().await {
            let event = match provider.persist_status(id, status).await {
                Ok(()) => RuntimeEvent::StatusPersisted { id, status },
                Err(err) => RuntimeEvent::PersistFailed {
                    id,
                    message: format!("{:#}", err),
                },
            };
            let _ = evt_tx.send(event);
        }
    });
    tx
}
