//! Panic containment for logging work.
//!
//! Extractors and sinks run under `catch_unwind`. The panic hook still fires
//! for those panics, so a thread-local flag tells the fatal guard that the
//! panic is already handled and must not be logged as fatal.

use std::any::Any;
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};

thread_local! {
    static CONTAINED: Cell<bool> = const { Cell::new(false) };
}

/// True while the current thread runs code inside [`contain`].
pub fn is_contained() -> bool {
    CONTAINED.with(Cell::get)
}

struct ContainedGuard(bool);

impl ContainedGuard {
    fn enter() -> Self {
        Self(CONTAINED.with(|flag| flag.replace(true)))
    }
}

impl Drop for ContainedGuard {
    fn drop(&mut self) {
        CONTAINED.with(|flag| flag.set(self.0));
    }
}

/// Run `f`, turning a panic into `Err(message)`.
pub fn contain<R>(f: impl FnOnce() -> R) -> Result<R, String> {
    let _guard = ContainedGuard::enter();
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| panic_message(payload.as_ref()))
}

/// Best-effort text of a panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
