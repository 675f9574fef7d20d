//! The process-wide probe result.

use crate::error::ProbeError;
use crate::features::Feature;
use crate::probe::{CpuInfo, ProbeConfig, probe};
use core::{
    cell::UnsafeCell,
    hint::spin_loop,
    mem::MaybeUninit,
    sync::atomic::{AtomicU8, Ordering},
};

const UNINIT: u8 = 0;
const INITING: u8 = 1;
const READY: u8 = 2;

/// Lifecycle of the process-wide state.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ProbeState {
    Uninitialized,
    Initializing,
    /// Terminal. The probe ran, successfully or not.
    Ready,
}

/// A write-once cell: exactly one caller runs the initializer, every other
/// caller waits for it and observes the same value.
pub(crate) struct InitCell<T> {
    state: AtomicU8,
    value: UnsafeCell<MaybeUninit<T>>,
}

impl<T> InitCell<T> {
    pub(crate) const fn new() -> Self {
        Self {
            state: AtomicU8::new(UNINIT),
            value: UnsafeCell::new(MaybeUninit::uninit()),
        }
    }

    pub(crate) fn state(&self) -> ProbeState {
        match self.state.load(Ordering::Acquire) {
            UNINIT => ProbeState::Uninitialized,
            INITING => ProbeState::Initializing,
            _ => ProbeState::Ready,
        }
    }

    #[inline]
    pub(crate) fn get(&self) -> Option<&T> {
        if self.state.load(Ordering::Acquire) == READY {
            // SAFETY: READY is only stored after the value was written.
            Some(unsafe { (*self.value.get()).assume_init_ref() })
        } else {
            None
        }
    }

    /// Run `init` unless another caller already did, then return the value.
    ///
    /// A panicking initializer resets the cell, so a later caller runs its own.
    pub(crate) fn get_or_init(&self, init: impl FnOnce() -> T) -> &T {
        loop {
            if let Some(v) = self.get() {
                return v;
            }

            if self
                .state
                .compare_exchange(UNINIT, INITING, Ordering::Acquire, Ordering::Relaxed)
                .is_ok()
            {
                let reset = ResetOnUnwind(&self.state);
                let v = init();
                core::mem::forget(reset);

                unsafe {
                    (*self.value.get()).write(v);
                }
                self.state.store(READY, Ordering::Release);
                // SAFETY: just written, and no other thread writes.
                return unsafe { (*self.value.get()).assume_init_ref() };
            }

            while self.state.load(Ordering::Acquire) == INITING {
                spin_loop();
            }
        }
    }
}

/// Puts the cell back to `UNINIT` if dropped while the initializer unwinds.
struct ResetOnUnwind<'a>(&'a AtomicU8);

impl Drop for ResetOnUnwind<'_> {
    fn drop(&mut self) {
        self.0.store(UNINIT, Ordering::Release);
    }
}

// SAFETY: the value is written once before READY and only read afterwards.
unsafe impl<T: Send + Sync> Sync for InitCell<T> {}
unsafe impl<T: Send> Send for InitCell<T> {}

struct Outcome {
    info: CpuInfo,
    error: Option<ProbeError>,
}

static STATE: InitCell<Outcome> = InitCell::new();

/// Probe the host processor once for the whole process.
///
/// The first call runs the probe; later calls return the same result without
/// touching the processor again.
///
/// # Errors
/// The error of the first probe, on this and every later call. The partial
/// result gathered before the failure is still visible through [`cpu_info`].
pub fn initialize() -> Result<&'static CpuInfo, ProbeError> {
    initialize_with(ProbeConfig::new())
}

/// Like [`initialize`], with explicit tuning. `config` is ignored once the
/// state is [`ProbeState::Ready`].
///
/// # Errors
/// See [`initialize`].
pub fn initialize_with(config: ProbeConfig) -> Result<&'static CpuInfo, ProbeError> {
    let outcome = STATE.get_or_init(|| match probe(&config) {
        Ok(info) => {
            log::debug!("processor state initialized");
            Outcome { info, error: None }
        }
        Err(failure) => {
            log::warn!("processor probe failed: {}", failure.error);
            Outcome {
                info: failure.partial,
                error: Some(failure.error),
            }
        }
    });

    outcome.error.map_or(Ok(&outcome.info), Err)
}

/// The process-wide result, or [`CpuInfo::EMPTY`] before [`initialize`] completed.
#[must_use]
pub fn cpu_info() -> &'static CpuInfo {
    STATE.get().map_or(&CpuInfo::EMPTY, |outcome| &outcome.info)
}

/// Whether the host supports `feature`. `false` before initialization.
#[must_use]
pub fn has_feature(feature: Feature) -> bool {
    cpu_info().has(feature)
}

#[must_use]
pub fn state() -> ProbeState {
    STATE.state()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn initializer_runs_once() {
        let cell = Arc::new(InitCell::<u32>::new());
        let calls = Arc::new(AtomicUsize::new(0));
        assert_eq!(cell.state(), ProbeState::Uninitialized);
        assert!(cell.get().is_none());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cell = Arc::clone(&cell);
                let calls = Arc::clone(&calls);
                std::thread::spawn(move || {
                    *cell.get_or_init(|| {
                        calls.fetch_add(1, Ordering::SeqCst);
                        42
                    })
                })
            })
            .collect();

        for h in handles {
            assert_eq!(h.join().expect("thread"), 42);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cell.state(), ProbeState::Ready);
        assert_eq!(cell.get(), Some(&42));
    }

    #[test]
    fn panicking_initializer_leaves_cell_retryable() {
        let cell = InitCell::<u32>::new();

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            cell.get_or_init(|| panic!("initializer failed"));
        }));
        assert!(result.is_err());
        assert_eq!(cell.state(), ProbeState::Uninitialized);

        assert_eq!(*cell.get_or_init(|| 7), 7);
        assert_eq!(cell.state(), ProbeState::Ready);
    }
}
