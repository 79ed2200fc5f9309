//! Scoped environment overrides for configuration tests.

use std::env;
use std::ffi::OsString;
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

static ENV_MUTEX: OnceLock<Mutex<()>> = OnceLock::new();

/// Guard that applies `INFRAGATE_*` overrides and restores the previous
/// values when dropped.
///
/// Holding the guard serializes every test that touches the environment.
pub struct EnvVarGuard {
    previous: Vec<(String, Option<OsString>)>,
    _lock: MutexGuard<'static, ()>,
}

impl EnvVarGuard {
    /// Sets (`Some`) or removes (`None`) each variable for the guard lifetime.
    #[must_use]
    pub fn apply(changes: &[(&str, Option<&str>)]) -> Self {
        let lock = env_lock();
        let previous = changes
            .iter()
            .map(|(name, value)| {
                let before = env::var_os(name);
                unsafe {
                    // SAFETY: the global mutex serializes environment mutations in tests.
                    match value {
                        Some(new_value) => env::set_var(name, new_value),
                        None => env::remove_var(name),
                    }
                }
                ((*name).to_owned(), before)
            })
            .collect();

        Self {
            previous,
            _lock: lock,
        }
    }

    /// Removes every listed variable for the guard lifetime.
    #[must_use]
    pub fn cleared(names: &[&str]) -> Self {
        let changes: Vec<_> = names.iter().map(|name| (*name, None)).collect();
        Self::apply(&changes)
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        for (name, value) in self.previous.drain(..).rev() {
            unsafe {
                // SAFETY: the global mutex serializes environment mutations in tests.
                match value {
                    Some(previous) => env::set_var(&name, &previous),
                    None => env::remove_var(&name),
                }
            }
        }
    }
}

fn env_lock() -> MutexGuard<'static, ()> {
    ENV_MUTEX
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}
