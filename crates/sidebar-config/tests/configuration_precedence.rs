use std::ffi::{OsStr, OsString};
use std::sync::{Mutex, MutexGuard};

use once_cell::sync::Lazy;
use sidebar_config::{Config, LogFormat};

static ENV_MUTEX: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

struct EnvOverride {
    key: &'static str,
    previous: Option<OsString>,
    guard: Option<MutexGuard<'static, ()>>,
}

impl EnvOverride {
    fn set_var(key: &'static str, value: &OsStr) -> Self {
        let guard = ENV_MUTEX.lock().expect("env mutex poisoned");
        let previous = std::env::var_os(key);
        // Environment mutation is `unsafe` on edition 2024; the override is
        // undone in `Drop` while the mutex is still held.
        unsafe { std::env::set_var(key, value) };
        Self {
            key,
            previous,
            guard: Some(guard),
        }
    }
}

impl Drop for EnvOverride {
    fn drop(&mut self) {
        match self.previous.take() {
            Some(value) => unsafe { std::env::set_var(self.key, value) },
            None => unsafe { std::env::remove_var(self.key) },
        }
        drop(self.guard.take());
    }
}

fn args(extra: &[&str]) -> Vec<OsString> {
    std::iter::once("sidebar-bridge")
        .chain(extra.iter().copied())
        .map(OsString::from)
        .collect()
}

#[test]
fn cli_flags_override_defaults() {
    let _lock = ENV_MUTEX.lock().expect("env mutex poisoned");
    let config = Config::load_from_iter(args(&[
        "--log-sheet",
        "Audit",
        "--log-format",
        "compact",
        "--store-chunk-size",
        "1024",
    ]))
    .expect("load configuration");

    assert_eq!(config.log_sheet(), "Audit");
    assert_eq!(config.log_format(), LogFormat::Compact);
    assert_eq!(config.store_chunk_size(), 1024);
    assert_eq!(config.store_sheet(), "Store");
}

#[test]
fn environment_overrides_defaults() {
    let _env = EnvOverride::set_var("SIDEBAR_STORE_SHEET", OsStr::new("IdStore"));
    let config = Config::load_from_iter(args(&[])).expect("load configuration");
    assert_eq!(config.store_sheet(), "IdStore");
    assert_eq!(config.log_sheet(), "Log");
}

#[test]
fn cli_flags_override_environment() {
    let _env = EnvOverride::set_var("SIDEBAR_JOB_ID_PROPERTY", OsStr::new("fromEnv"));
    let config = Config::load_from_iter(args(&["--job-id-property", "fromCli"]))
        .expect("load configuration");
    assert_eq!(config.job_id_property(), "fromCli");
}
