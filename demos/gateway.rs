//! Minimal gateway: a cloud connectivity module driven over the bus.
//!
//! A driver task plays the modem and cloud collaborators: it brings the LTE
//! link up, lets a couple of connect attempts time out so the backoff table
//! is visible in the logs, then delivers a successful connection.
//!
//! Run with: `cargo run --example gateway`

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use modactor::{
    mailbox, Bus, BusBuilder, Envelope, EventSet, EventType, EventTypeFlags, EventTypeInfo,
    ForwardListener, Host, HostConfig, MailboxConfig, Module, RetryBackoff, RetryError, StateCell,
    Tier, Watchdog,
};

#[derive(Clone, Debug, PartialEq)]
enum DemoEvent {
    Modem(ModemEvent),
    Cloud(CloudEvent),
}

#[derive(Clone, Debug, PartialEq)]
enum ModemEvent {
    Initialized,
    LteConnected,
}

#[derive(Clone, Debug, PartialEq)]
enum CloudEvent {
    Connecting,
    Connected,
    ConnectionTimeout,
    Error(i32),
}

static MODEM_EVENT: EventTypeInfo<DemoEvent> = EventTypeInfo {
    name: "modem_event",
    log_payload: Some(|payload| format!("{payload:?}")),
    flags: EventTypeFlags { log_enabled: true },
};

static CLOUD_EVENT: EventTypeInfo<DemoEvent> = EventTypeInfo {
    name: "cloud_event",
    log_payload: Some(|payload| format!("{payload:?}")),
    flags: EventTypeFlags { log_enabled: true },
};

impl EventSet for DemoEvent {
    fn event_type(&self) -> EventType<DemoEvent> {
        match self {
            DemoEvent::Modem(_) => EventType::of(&MODEM_EVENT),
            DemoEvent::Cloud(_) => EventType::of(&CLOUD_EVENT),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum CloudState {
    Init,
    LteDisconnected,
    LteConnected,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum CloudSubState {
    CloudDisconnected,
    CloudConnected,
}

/// Short reconnect table so the demo churns within a couple of seconds.
static DEMO_BACKOFF: [Duration; 3] = [
    Duration::from_millis(250),
    Duration::from_millis(500),
    Duration::from_millis(1000),
];

struct CloudModule {
    bus: Bus<DemoEvent>,
    state: StateCell<CloudState>,
    sub_state: StateCell<CloudSubState>,
    retry: RetryBackoff,
    watchdog: Watchdog,
}

impl CloudModule {
    fn new(bus: Bus<DemoEvent>) -> Self {
        Self {
            bus,
            state: StateCell::new("cloud", "state", CloudState::Init),
            sub_state: StateCell::new("cloud", "sub_state", CloudSubState::CloudDisconnected),
            retry: RetryBackoff::new(&DEMO_BACKOFF, 5),
            watchdog: Watchdog::new("cloud"),
        }
    }

    async fn connect_cloud(&mut self) {
        match self.retry.next() {
            Ok(delay) => {
                info!(
                    attempt = self.retry.attempts(),
                    ?delay,
                    "connecting to cloud, next attempt if not successful"
                );
                let _ = self.bus.submit(DemoEvent::Cloud(CloudEvent::Connecting)).await;

                let bus = self.bus.clone();
                self.watchdog.arm(delay, async move {
                    let _ = bus
                        .submit(DemoEvent::Cloud(CloudEvent::ConnectionTimeout))
                        .await;
                });
            }
            Err(RetryError::Exhausted { attempts }) => {
                info!(attempts, "too many failed cloud connection attempts");
                let _ = self.bus.submit(DemoEvent::Cloud(CloudEvent::Error(-101))).await;
            }
        }
    }
}

#[async_trait]
impl Module for CloudModule {
    type Msg = DemoEvent;

    fn name(&self) -> &'static str {
        "cloud"
    }

    fn supports_shutdown(&self) -> bool {
        true
    }

    async fn on_state(&mut self, msg: &DemoEvent) {
        match self.state.get() {
            CloudState::Init => {
                if let DemoEvent::Modem(ModemEvent::Initialized) = msg {
                    self.state.set(CloudState::LteDisconnected);
                }
            }
            CloudState::LteDisconnected => {
                if let DemoEvent::Modem(ModemEvent::LteConnected) = msg {
                    self.state.set(CloudState::LteConnected);
                    self.connect_cloud().await;
                }
            }
            CloudState::LteConnected => match self.sub_state.get() {
                CloudSubState::CloudDisconnected => {
                    if let DemoEvent::Cloud(CloudEvent::Connected) = msg {
                        self.sub_state.set(CloudSubState::CloudConnected);
                        self.retry.reset();
                        self.watchdog.cancel();
                        info!("cloud session established");
                    }
                    if let DemoEvent::Cloud(CloudEvent::ConnectionTimeout) = msg {
                        info!("cloud connection timeout occurred");
                        self.connect_cloud().await;
                    }
                }
                CloudSubState::CloudConnected => {}
            },
        }
    }
}

fn cloud_map(env: &Envelope<DemoEvent>) -> Option<DemoEvent> {
    Some(env.payload().clone())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .init();

    let mut builder = BusBuilder::new();
    let modem = builder.register(&MODEM_EVENT)?;
    let cloud = builder.register(&CLOUD_EVENT)?;

    let (cloud_tx, cloud_rx) = mailbox(MailboxConfig::default());
    builder.subscribe(
        Tier::Early,
        vec![cloud],
        Arc::new(ForwardListener::new("cloud", cloud_tx.clone(), cloud_map)),
    );
    builder.subscribe(
        Tier::Normal,
        vec![modem],
        Arc::new(ForwardListener::new("cloud", cloud_tx, cloud_map)),
    );
    let bus = builder.build();

    let mut host = Host::new(HostConfig {
        grace: Duration::from_secs(5),
    });
    host.spawn(CloudModule::new(bus.clone()), cloud_rx);

    // Driver: plays the modem and the cloud backend.
    let driver_bus = bus.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        let _ = driver_bus
            .submit(DemoEvent::Modem(ModemEvent::Initialized))
            .await;
        let _ = driver_bus
            .submit(DemoEvent::Modem(ModemEvent::LteConnected))
            .await;

        // Let the first two attempts time out, then connect.
        tokio::time::sleep(Duration::from_millis(900)).await;
        let _ = driver_bus
            .submit(DemoEvent::Cloud(CloudEvent::Connected))
            .await;
    });

    tokio::time::sleep(Duration::from_secs(2)).await;
    host.shutdown().await?;
    Ok(())
}
