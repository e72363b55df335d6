// std
use std::backtrace::{Backtrace, BacktraceStatus};
use std::panic::{self, PanicHookInfo};
use std::thread;

/// Target panics are logged under, separate from request errors.
pub const PANIC_TARGET: &str = "da_proxy::panic";

/// Replaces the default panic hook with one that logs through `tracing`.
///
/// A panic inside a request handler only kills that task, so without this it
/// would never reach the file or json sinks.
pub fn install_panic_hook() {
    panic::set_hook(Box::new(log_panic));
}

fn payload_str<'a>(info: &'a PanicHookInfo) -> &'a str {
    let payload = info.payload();
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("<non-string payload>")
}

fn log_panic(info: &PanicHookInfo) {
    let backtrace = Backtrace::capture();
    let backtrace = match backtrace.status() {
        BacktraceStatus::Captured => backtrace.to_string(),
        _ => String::from("set RUST_BACKTRACE=1 to capture a backtrace"),
    };
    tracing::error!(
        target: PANIC_TARGET,
        thread = thread::current().name().unwrap_or("<unnamed>"),
        location = info.location().map(ToString::to_string),
        backtrace,
        "Panicked: {}",
        payload_str(info),
    );
}
