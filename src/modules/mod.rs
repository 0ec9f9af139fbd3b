//! Module runtime: mailboxes, state registers, actors and the host.
//!
//! Internal modules:
//! - `mailbox`: bounded FIFO queues and the bus-to-mailbox forwarding
//!   listener;
//! - `state`: state registers with transition diagnostics;
//! - `module`: the [`Module`] trait (two-level dispatch contract);
//! - `actor`: the serialized dispatch loop;
//! - `host`: spawning, cooperative cancellation and graceful shutdown;
//! - `signal`: OS termination signal handling.

mod actor;
mod host;
mod mailbox;
mod module;
mod signal;
mod state;

pub use actor::ModuleActor;
pub use host::Host;
pub use mailbox::{mailbox, ForwardListener, Mailbox, MailboxSender};
pub use module::Module;
pub use state::StateCell;
