//! Process runtime hooks for unrecoverable errors.

use std::error::Error;
use std::fmt;
use std::panic;
use std::sync::{Once, PoisonError, RwLock};
use std::thread;

use crate::lifecycle::containment::{contain, is_contained, panic_message};

/// An unrecoverable error reported by the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FatalError {
    pub message: String,
    /// Location, thread, cause chain: whatever the runtime could gather.
    pub detail: Option<String>,
}

impl FatalError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Message from `error`, detail from its `source()` chain.
    pub fn from_error(error: &(dyn Error + 'static)) -> Self {
        let mut causes = Vec::new();
        let mut source = error.source();
        while let Some(cause) = source {
            causes.push(cause.to_string());
            source = cause.source();
        }

        let fatal = Self::new(error.to_string());
        if causes.is_empty() {
            fatal
        } else {
            fatal.with_detail(format!("caused by: {}", causes.join(": ")))
        }
    }
}

impl fmt::Display for FatalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            Some(detail) => write!(f, "{} ({})", self.message, detail),
            None => f.write_str(&self.message),
        }
    }
}

/// Callback run once per unrecoverable error.
pub type FatalHook = Box<dyn Fn(&FatalError) + Send + Sync>;

/// The host runtime's last-resort error hook.
pub trait ProcessRuntime {
    /// Install `hook` as the single fatal-error handler, replacing any earlier one.
    ///
    /// The runtime's default behavior (printing, termination) must still run
    /// after the hook returns.
    fn set_fatal_hook(&self, hook: FatalHook);
}

static FATAL_HOOK: RwLock<Option<FatalHook>> = RwLock::new(None);
static PANIC_HOOK: Once = Once::new();

/// Routes uncaught panics to the fatal hook.
///
/// The std panic hook is wrapped exactly once per process; later calls only
/// swap the fatal hook. The previous panic hook always runs afterwards, so
/// the usual message and unwinding or abort behavior are unchanged. Panics
/// raised inside contained logging work are skipped. The fatal hook runs on
/// a helper thread, so a hook that panics cannot turn an unwind into an abort.
#[derive(Debug, Default, Clone, Copy)]
pub struct PanicRuntime;

impl ProcessRuntime for PanicRuntime {
    fn set_fatal_hook(&self, hook: FatalHook) {
        *FATAL_HOOK.write().unwrap_or_else(PoisonError::into_inner) = Some(hook);

        PANIC_HOOK.call_once(|| {
            let previous = panic::take_hook();
            panic::set_hook(Box::new(move |info| {
                if !is_contained() {
                    let thread = thread::current();
                    let mut detail = format!("thread '{}'", thread.name().unwrap_or("<unnamed>"));
                    if let Some(location) = info.location() {
                        detail.push_str(&format!(" at {location}"));
                    }
                    let error = FatalError::new(panic_message(info.payload())).with_detail(detail);

                    if let Ok(hook) = FATAL_HOOK.try_read() {
                        if let Some(hook) = hook.as_ref() {
                            run_detached(hook, &error);
                        }
                    }
                }
                previous(info);
            }));
        });
    }
}

/// Run `hook` on a scoped helper thread and wait for it.
///
/// A panic raised while the panic hook is running aborts the process. On the
/// helper thread it is an ordinary, contained panic that `join` reports.
fn run_detached(hook: &FatalHook, error: &FatalError) {
    thread::scope(|scope| {
        let spawned = thread::Builder::new()
            .name("fatal-hook".into())
            .spawn_scoped(scope, || contain(|| hook(error)));
        if let Ok(handle) = spawned {
            let _ = handle.join();
        }
    });
}
