//! # Host: spawns module actors and drives graceful shutdown.
//!
//! The [`Host`] owns the spawned actor loops. Each [`spawn`](Host::spawn)
//! pairs a module with its mailbox, derives a child
//! [`CancellationToken`], and adds the actor's future to a
//! [`tokio::task::JoinSet`].
//!
//! ## Shutdown path
//! ```text
//! signal / shutdown() ──► runtime token cancelled
//!                           │ (opted-in actors exit between messages)
//!                           ▼
//!                 wait up to HostConfig::grace
//!                     ├─ all joined  → Ok(())
//!                     └─ timeout     → RuntimeError::GraceExceeded { stuck }
//!                                      (remaining actors aborted on drop)
//! ```
//!
//! Shutdown is cooperative: only modules that advertise
//! [`supports_shutdown`](crate::Module::supports_shutdown) observe the
//! token. A module that opted out and whose mailbox stays open is reported
//! in the stuck list.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use crate::config::HostConfig;
use crate::error::RuntimeError;

use super::actor::ModuleActor;
use super::mailbox::Mailbox;
use super::module::Module;
use super::signal;

/// Runtime owner of the module actor loops.
pub struct Host {
    cfg: HostConfig,
    token: CancellationToken,
    set: JoinSet<()>,
    running: Arc<Mutex<BTreeSet<&'static str>>>,
}

impl Host {
    /// Creates an empty host.
    pub fn new(cfg: HostConfig) -> Self {
        Self {
            cfg,
            token: CancellationToken::new(),
            set: JoinSet::new(),
            running: Arc::new(Mutex::new(BTreeSet::new())),
        }
    }

    /// Moves a module and its mailbox into a freshly spawned actor loop.
    pub fn spawn<A: Module>(&mut self, module: A, mailbox: Mailbox<A::Msg>) {
        let name = module.name();
        self.running.lock().unwrap().insert(name);

        let actor = ModuleActor::new(module, mailbox);
        let child = self.token.child_token();
        let running = Arc::clone(&self.running);
        self.set.spawn(async move {
            actor.run(child).await;
            running.lock().unwrap().remove(name);
        });
    }

    /// Number of actors spawned so far.
    pub fn len(&self) -> usize {
        self.set.len()
    }

    /// True if no actor was spawned.
    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// Runs until either all actors exit on their own or a termination
    /// signal arrives, then performs graceful shutdown.
    pub async fn run(mut self) -> Result<(), RuntimeError> {
        let mut set = std::mem::take(&mut self.set);
        tokio::select! {
            _ = signal::wait_for_shutdown_signal() => {
                debug!("shutdown signal received");
                self.token.cancel();
                self.wait_with_grace(&mut set).await
            }
            _ = async { while set.join_next().await.is_some() {} } => {
                Ok(())
            }
        }
    }

    /// Programmatic shutdown: cancels the runtime token and waits up to the
    /// configured grace period for actors to stop.
    pub async fn shutdown(mut self) -> Result<(), RuntimeError> {
        let mut set = std::mem::take(&mut self.set);
        self.token.cancel();
        self.wait_with_grace(&mut set).await
    }

    /// Waits for all actors to finish within the grace period. On timeout,
    /// reports the still-running modules; dropping the join set then aborts
    /// them.
    async fn wait_with_grace(&self, set: &mut JoinSet<()>) -> Result<(), RuntimeError> {
        let grace = self.cfg.grace;
        let done = async { while set.join_next().await.is_some() {} };

        match tokio::time::timeout(grace, done).await {
            Ok(()) => Ok(()),
            Err(_) => {
                let stuck: Vec<String> = self
                    .running
                    .lock()
                    .unwrap()
                    .iter()
                    .map(|name| name.to_string())
                    .collect();
                error!(?grace, ?stuck, "graceful shutdown window exceeded");
                Err(RuntimeError::GraceExceeded { grace, stuck })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MailboxConfig;
    use crate::modules::mailbox::mailbox;
    use async_trait::async_trait;
    use std::time::Duration;

    struct Sink {
        name: &'static str,
        cooperative: bool,
    }

    #[async_trait]
    impl Module for Sink {
        type Msg = u32;

        fn name(&self) -> &'static str {
            self.name
        }

        fn supports_shutdown(&self) -> bool {
            self.cooperative
        }

        async fn on_state(&mut self, _msg: &u32) {}
    }

    #[tokio::test(start_paused = true)]
    async fn cooperative_modules_shut_down_cleanly() {
        let mut host = Host::new(HostConfig {
            grace: Duration::from_secs(5),
        });

        let (tx, rx) = mailbox(MailboxConfig::default());
        host.spawn(
            Sink {
                name: "cooperative",
                cooperative: true,
            },
            rx,
        );
        assert_eq!(host.len(), 1);

        tx.enqueue(1).await.unwrap();
        // Sender stays alive: only the cancellation can stop the actor.
        let result = host.shutdown().await;
        drop(tx);
        assert!(result.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn stubborn_module_reported_stuck() {
        let mut host = Host::new(HostConfig {
            grace: Duration::from_secs(5),
        });

        let (stubborn_tx, stubborn_rx) = mailbox::<u32>(MailboxConfig::default());
        let (coop_tx, coop_rx) = mailbox::<u32>(MailboxConfig::default());
        host.spawn(
            Sink {
                name: "stubborn",
                cooperative: false,
            },
            stubborn_rx,
        );
        host.spawn(
            Sink {
                name: "cooperative",
                cooperative: true,
            },
            coop_rx,
        );

        let err = host.shutdown().await.unwrap_err();
        match err {
            RuntimeError::GraceExceeded { stuck, .. } => {
                assert_eq!(stuck, vec!["stubborn".to_string()]);
            }
        }
        drop(stubborn_tx);
        drop(coop_tx);
    }

    #[tokio::test]
    async fn run_returns_when_all_actors_exit() {
        let mut host = Host::new(HostConfig::default());
        let (tx, rx) = mailbox::<u32>(MailboxConfig::default());
        host.spawn(
            Sink {
                name: "oneshot",
                cooperative: false,
            },
            rx,
        );

        tx.enqueue(7).await.unwrap();
        drop(tx); // mailbox closes, actor exits on its own
        host.run().await.unwrap();
    }
}
