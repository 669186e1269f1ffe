/// Panic capture for test bodies
///
/// A hook is installed once that forwards to the previous hook unless the
/// current thread is inside `catch`, so panicking tests do not spill
/// backtraces onto the terminal while other threads keep normal reporting.
use std::any::Any;
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;

static INSTALL_HOOK: Once = Once::new();

thread_local! {
    static SILENCED: Cell<bool> = const { Cell::new(false) };
}

fn install_hook() {
    INSTALL_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if !SILENCED.with(Cell::get) {
                previous(info);
            }
        }));
    });
}

/// Payload raised by [`assert_that`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionFailure(pub String);

/// Panic with an assertion payload when `condition` does not hold
///
/// Unlike `assert!(cond, "msg")`, whose message carries no marker, this is
/// always classified as a failure.
#[track_caller]
pub fn assert_that(condition: bool, message: impl Into<String>) {
    if !condition {
        std::panic::panic_any(AssertionFailure(message.into()));
    }
}

/// A caught panic, split by whether an assertion raised it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaughtPanic {
    Assertion(String),
    Other(String),
}

/// Run `f`, turning a panic into its classified message
pub fn catch<F, R>(f: F) -> Result<R, CaughtPanic>
where
    F: FnOnce() -> R,
{
    install_hook();

    let was_silenced = SILENCED.with(|s| s.replace(true));
    let result = panic::catch_unwind(AssertUnwindSafe(f));
    SILENCED.with(|s| s.set(was_silenced));

    result.map_err(|payload| classify(payload.as_ref()))
}

fn classify(payload: &(dyn Any + Send)) -> CaughtPanic {
    if let Some(AssertionFailure(message)) = payload.downcast_ref::<AssertionFailure>() {
        return CaughtPanic::Assertion(message.clone());
    }

    let message = if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "test panicked with a non-string payload".to_string()
    };

    // Messages of the std assertion macros.
    if message.starts_with("assertion") {
        CaughtPanic::Assertion(message)
    } else {
        CaughtPanic::Other(message)
    }
}
