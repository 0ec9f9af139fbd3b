//! # ModuleActor: the serialized dispatch loop.
//!
//! Runs one [`Module`] against its [`Mailbox`]: dequeue a message, feed it
//! through the module's state machine, loop. Messages are handled strictly
//! one at a time, so the module's state registers never race with anything.
//!
//! ## Loop
//! ```text
//! loop {
//!   ├─► msg = mailbox.next().await          (sole suspension point)
//!   ├─► module.on_state(&msg).await         (super-/sub-state dispatch)
//!   ├─► module.on_all_states(&msg).await    (unconditional)
//!   └─► continue
//! }
//! ```
//!
//! ## Rules
//! - Each message runs to completion before the next is dequeued.
//! - A panic inside dispatch is caught and logged; the loop continues with
//!   the next message.
//! - Cancellation is observed **between** messages, and only when the module
//!   opted in via [`Module::supports_shutdown`].

use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use tokio::select;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use super::mailbox::Mailbox;
use super::module::Module;

/// Owns one module and its mailbox; consumed by [`run`](Self::run).
pub struct ModuleActor<A: Module> {
    module: A,
    mailbox: Mailbox<A::Msg>,
}

impl<A: Module> ModuleActor<A> {
    /// Pairs a module with the mailbox its listeners feed.
    pub fn new(module: A, mailbox: Mailbox<A::Msg>) -> Self {
        Self { module, mailbox }
    }

    /// Runs the dispatch loop until the mailbox closes or, for modules that
    /// support shutdown, until `token` is cancelled.
    pub async fn run(mut self, token: CancellationToken) {
        let name = self.module.name();
        debug!(module = name, "actor started");

        loop {
            let next = if self.module.supports_shutdown() {
                select! {
                    _ = token.cancelled() => break,
                    msg = self.mailbox.next() => msg,
                }
            } else {
                self.mailbox.next().await
            };

            let Some(msg) = next else {
                break;
            };

            let dispatch = async {
                self.module.on_state(&msg).await;
                self.module.on_all_states(&msg).await;
            };
            if let Err(panic) = AssertUnwindSafe(dispatch).catch_unwind().await {
                error!(module = name, "module dispatch panicked: {panic:?}");
            }
        }

        debug!(module = name, "actor stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MailboxConfig;
    use crate::modules::mailbox::mailbox;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    struct Collector {
        seen: Arc<Mutex<Vec<u32>>>,
        panic_on: Option<u32>,
    }

    #[async_trait]
    impl Module for Collector {
        type Msg = u32;

        fn name(&self) -> &'static str {
            "collector"
        }

        fn supports_shutdown(&self) -> bool {
            true
        }

        async fn on_state(&mut self, msg: &u32) {
            if self.panic_on == Some(*msg) {
                panic!("injected failure");
            }
            self.seen.lock().unwrap().push(*msg);
        }
    }

    #[tokio::test]
    async fn messages_dispatch_in_fifo_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let (tx, rx) = mailbox(MailboxConfig::default());
        let actor = ModuleActor::new(
            Collector {
                seen: Arc::clone(&seen),
                panic_on: None,
            },
            rx,
        );

        for n in 0..8 {
            tx.enqueue(n).await.unwrap();
        }
        drop(tx);
        actor.run(CancellationToken::new()).await;

        assert_eq!(*seen.lock().unwrap(), (0..8).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn panicking_dispatch_does_not_kill_the_loop() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let (tx, rx) = mailbox(MailboxConfig::default());
        let actor = ModuleActor::new(
            Collector {
                seen: Arc::clone(&seen),
                panic_on: Some(2),
            },
            rx,
        );

        for n in 1..=3 {
            tx.enqueue(n).await.unwrap();
        }
        drop(tx);
        actor.run(CancellationToken::new()).await;

        // Message 2 panicked; 3 was still processed.
        assert_eq!(*seen.lock().unwrap(), vec![1, 3]);
    }

    #[tokio::test]
    async fn cancellation_stops_opted_in_actor() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let (tx, rx) = mailbox(MailboxConfig::default());
        let actor = ModuleActor::new(
            Collector {
                seen: Arc::clone(&seen),
                panic_on: None,
            },
            rx,
        );

        let token = CancellationToken::new();
        token.cancel();
        actor.run(token).await;

        // Sender still alive: without cancellation the loop would block.
        drop(tx);
        assert!(seen.lock().unwrap().is_empty());
    }
}
