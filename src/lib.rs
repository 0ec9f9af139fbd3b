//! # modactor
//!
//! **modactor** is an event-driven module actor framework for Rust.
//!
//! It provides the pattern connectivity firmware and gateway daemons keep
//! reinventing: a typed publish/subscribe event bus that decouples
//! independently scheduled *modules*, each of which receives bus events into
//! a private serialized mailbox and advances an explicit
//! (super-state, sub-state) state machine.
//!
//! ## Architecture
//! ```text
//!  producer (any actor, or a collaborator callback translated into one)
//!      │ submit(payload)
//!      ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Bus (synchronous fan-out, runs on the producer's task)           │
//! │  - Registry (static event type catalog, identity by descriptor)   │
//! │  - Subscription table (frozen at build; EARLY before NORMAL)      │
//! └──────┬──────────────────────┬──────────────────────┬──────────────┘
//!        ▼                      ▼                      ▼
//!  ForwardListener        ForwardListener        ForwardListener
//!  (filter + copy)        (filter + copy)        (filter + copy)
//!        │                      │                      │
//!   [mailbox A]            [mailbox B]            [mailbox C]
//!        │                      │                      │
//!        ▼                      ▼                      ▼
//! ┌──────────────┐      ┌──────────────┐      ┌──────────────┐
//! │ ModuleActor  │      │ ModuleActor  │      │ ModuleActor  │
//! │ on_state     │      │ on_state     │      │ on_state     │
//! │ on_all_states│      │ on_all_states│      │ on_all_states│
//! └──────┬───────┘      └──────┬───────┘      └──────┬───────┘
//!        │      Publishes new events back into the Bus      │
//!        └──────────────────────┴──────────────────────┴────┘
//!
//! Host: spawns the actor loops, owns the runtime CancellationToken,
//!       waits up to a grace period on shutdown.
//! ```
//!
//! ## Guarantees
//! | Area            | Guarantee                                                              |
//! |-----------------|------------------------------------------------------------------------|
//! | **Fan-out**     | Every subscribed listener is invoked exactly once per submission, tier-ordered; the `consumed` flag never short-circuits dispatch. |
//! | **Lifetime**    | The bus owns the envelope for the whole dispatch and drops it when the last listener returns; listeners only borrow it.            |
//! | **Ordering**    | Per-mailbox strict FIFO; a module never handles two messages concurrently. No ordering across modules.                             |
//! | **State**       | A module's state registers are mutated only from its own dispatch.     |
//! | **Timeouts**    | [`Watchdog`] holds at most one pending deadline; re-arm replaces it.   |
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use modactor::{
//!     mailbox, BusBuilder, Envelope, EventSet, EventType, EventTypeFlags, EventTypeInfo,
//!     ForwardListener, Host, HostConfig, MailboxConfig, Module, StateCell, Tier,
//! };
//!
//! #[derive(Clone, Debug, PartialEq)]
//! enum AppEvent {
//!     Blink(Blink),
//! }
//!
//! #[derive(Clone, Debug, PartialEq)]
//! enum Blink {
//!     On,
//!     Off,
//! }
//!
//! static BLINK_EVENT: EventTypeInfo<AppEvent> = EventTypeInfo {
//!     name: "blink_event",
//!     log_payload: None,
//!     flags: EventTypeFlags { log_enabled: false },
//! };
//!
//! impl EventSet for AppEvent {
//!     fn event_type(&self) -> EventType<AppEvent> {
//!         match self {
//!             AppEvent::Blink(_) => EventType::of(&BLINK_EVENT),
//!         }
//!     }
//! }
//!
//! #[derive(Clone, Copy, Debug, PartialEq)]
//! enum LedState {
//!     Off,
//!     On,
//! }
//!
//! struct LedModule {
//!     state: StateCell<LedState>,
//! }
//!
//! #[async_trait]
//! impl Module for LedModule {
//!     type Msg = AppEvent;
//!
//!     fn name(&self) -> &'static str {
//!         "led"
//!     }
//!
//!     fn supports_shutdown(&self) -> bool {
//!         true
//!     }
//!
//!     async fn on_state(&mut self, msg: &AppEvent) {
//!         match (self.state.get(), msg) {
//!             (LedState::Off, AppEvent::Blink(Blink::On)) => self.state.set(LedState::On),
//!             (LedState::On, AppEvent::Blink(Blink::Off)) => self.state.set(LedState::Off),
//!             _ => {} // irrelevant in this state: dropped
//!         }
//!     }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut builder = BusBuilder::new();
//!     let blink = builder.register(&BLINK_EVENT)?;
//!
//!     let (tx, rx) = mailbox::<AppEvent>(MailboxConfig::default());
//!     builder.subscribe(
//!         Tier::Normal,
//!         vec![blink],
//!         Arc::new(ForwardListener::new("led", tx, |env: &Envelope<AppEvent>| Some(env.payload().clone()))),
//!     );
//!     let bus = builder.build();
//!
//!     let mut host = Host::new(HostConfig::default());
//!     host.spawn(
//!         LedModule {
//!             state: StateCell::new("led", "state", LedState::Off),
//!         },
//!         rx,
//!     );
//!
//!     bus.submit(AppEvent::Blink(Blink::On)).await?;
//!     host.shutdown().await?;
//!     Ok(())
//! }
//! ```

mod config;
mod error;
mod events;
mod modules;
mod policies;

// ---- Public re-exports ----

pub use config::{HostConfig, MailboxConfig, OverflowPolicy};
pub use error::{BusError, EnqueueError, RegistryError, RetryError, RuntimeError};
pub use events::{
    Bus, BusBuilder, Envelope, EventSet, EventType, EventTypeFlags, EventTypeInfo, Listen,
    Registry, Tier,
};
pub use modules::{mailbox, ForwardListener, Host, Mailbox, MailboxSender, Module, ModuleActor, StateCell};
pub use policies::{Jitter, RetryBackoff, Watchdog, DEFAULT_CONNECT_BACKOFF};
