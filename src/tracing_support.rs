//! Logging support.
//!
//! With the `tracing` feature enabled this re-exports the `tracing` macros the
//! crate uses; without it, the same names expand to nothing so call sites
//! need no `cfg` attributes.

#[cfg(feature = "tracing")]
mod enabled {
    use std::sync::Once;

    pub(crate) use tracing::{debug_span, trace, warn};

    /// Installs a `fmt` subscriber that writes through the test harness's
    /// captured output.  Safe to call any number of times; only the first
    /// call has an effect, and an already-installed global subscriber wins.
    pub fn init_tracing() {
        static INIT: Once = Once::new();
        INIT.call_once(|| {
            let _ = tracing_subscriber::fmt()
                .with_max_level(tracing::Level::TRACE)
                .with_test_writer()
                .try_init();
        });
    }
}

#[cfg(not(feature = "tracing"))]
mod disabled {
    pub fn init_tracing() {
        // No-op when tracing is disabled
    }

    macro_rules! trace {
        ($($args:tt)*) => {{}};
    }

    macro_rules! warn {
        ($($args:tt)*) => {{}};
    }

    macro_rules! debug_span {
        ($($args:tt)*) => {{ $crate::tracing_support::NoOpSpan }};
    }

    pub(crate) use {debug_span, trace, warn};

    pub struct NoOpSpan;

    impl NoOpSpan {
        pub fn entered(self) -> NoOpSpanGuard {
            NoOpSpanGuard
        }
    }

    pub struct NoOpSpanGuard;
}

#[cfg(feature = "tracing")]
pub use enabled::*;

#[cfg(not(feature = "tracing"))]
pub use disabled::*;
