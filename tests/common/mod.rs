//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use event_logger::config::ChannelLevels;
use event_logger::dispatch::Dispatcher;
use event_logger::events::{BindingTable, EventBus, InMemoryEventBus, ManualClock};
use event_logger::lifecycle::{FatalError, FatalHook, ProcessRuntime};
use event_logger::logging::{ChannelRegistry, LogRecord, MemorySink, Severity, Sink, SinkError};

/// Start time of every manual clock handed out here.
pub const CLOCK_START: u64 = 1_700_000_000_000;

/// Dispatcher wired to a fresh bus, a memory sink and a manual clock.
pub struct Harness {
    pub bus: Arc<InMemoryEventBus>,
    pub sink: Arc<MemorySink>,
    pub clock: Arc<ManualClock>,
    pub dispatcher: Arc<Dispatcher>,
}

impl Harness {
    pub fn new(levels: ChannelLevels) -> Self {
        Self::with_bindings(levels, BindingTable::predefined())
    }

    pub fn with_bindings(levels: ChannelLevels, bindings: BindingTable) -> Self {
        let sink = Arc::new(MemorySink::new());
        let clock = Arc::new(ManualClock::new(CLOCK_START));
        let registry = ChannelRegistry::new(levels, sink.clone());
        let dispatcher = Arc::new(Dispatcher::new(registry, bindings, clock.clone()));

        let bus = Arc::new(InMemoryEventBus::new());
        dispatcher.initialize(bus.as_ref());

        Self {
            bus,
            sink,
            clock,
            dispatcher,
        }
    }

    /// Every channel at `trace`.
    pub fn verbose() -> Self {
        Self::new(ChannelLevels::uniform(Severity::Trace))
    }

    pub fn bus(&self) -> &dyn EventBus {
        self.bus.as_ref()
    }
}

/// Dispatcher over a sink other than memory, with no bus attached.
pub fn dispatcher_with_sink(sink: Arc<dyn Sink>, levels: ChannelLevels) -> Arc<Dispatcher> {
    let registry = ChannelRegistry::new(levels, sink);
    Arc::new(Dispatcher::new(
        registry,
        BindingTable::predefined(),
        Arc::new(ManualClock::new(CLOCK_START)),
    ))
}

/// Sink whose writes always fail.
pub struct FailingSink;

impl Sink for FailingSink {
    fn write(&self, _record: &LogRecord) -> Result<(), SinkError> {
        Err(SinkError("disk full".into()))
    }
}

/// Sink that panics on every write.
pub struct PanickingSink;

impl Sink for PanickingSink {
    fn write(&self, _record: &LogRecord) -> Result<(), SinkError> {
        panic!("sink exploded")
    }
}

/// Runtime that stores the fatal hook so tests can trigger it by hand.
#[derive(Default)]
pub struct FakeRuntime {
    hook: Mutex<Option<FatalHook>>,
    installs: Mutex<usize>,
}

impl FakeRuntime {
    pub fn trigger(&self, error: &FatalError) {
        if let Some(hook) = self.hook.lock().unwrap().as_ref() {
            hook(error);
        }
    }

    pub fn installs(&self) -> usize {
        *self.installs.lock().unwrap()
    }
}

impl ProcessRuntime for FakeRuntime {
    fn set_fatal_hook(&self, hook: FatalHook) {
        *self.hook.lock().unwrap() = Some(hook);
        *self.installs.lock().unwrap() += 1;
    }
}
