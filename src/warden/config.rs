//! Configuration resolution for the decision engine.
//!
//! Values are resolved with a three-tier priority system:
//!
//! 1. **Parameter** - Explicitly provided builder parameter (highest priority)
//! 2. **Environment Variable** - Value from environment variable
//! 3. **Default** - Built-in default value (lowest priority)
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `WARDEN_STALL_SECS` | 5s | Duration of the deliberate slow-credential stall |

use std::env;

/// Default duration of the deliberate slow-credential stall in seconds
pub(crate) const DEFAULT_STALL_SECS: u64 = 5;

/// Environment variable name for the slow-credential stall duration
pub(crate) const STALL_SECS_ENV_VAR: &str = "WARDEN_STALL_SECS";

/// Resolve the stall duration with priority: parameter -> env var -> default
pub(crate) fn resolve_stall_secs(stall_param: Option<u64>) -> u64 {
    // Priority 1: Use parameter if provided
    if let Some(stall) = stall_param {
        return stall;
    }

    // Priority 2: Use environment variable if set
    if let Ok(env_stall) = env::var(STALL_SECS_ENV_VAR)
        && let Ok(stall) = env_stall.parse::<u64>()
    {
        return stall;
    }

    // Priority 3: Default value
    DEFAULT_STALL_SECS
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;

    // Use a mutex to serialize env var tests to avoid race conditions
    // SAFETY: Tests are serialized via ENV_TEST_MUTEX to prevent data races
    static ENV_TEST_MUTEX: once_cell::sync::Lazy<StdMutex<()>> =
        once_cell::sync::Lazy::new(|| StdMutex::new(()));

    /// Helper to set an environment variable safely within tests.
    /// SAFETY: Must be called while holding ENV_TEST_MUTEX to prevent data races.
    unsafe fn set_env(key: &str, value: &str) {
        // SAFETY: Caller ensures ENV_TEST_MUTEX is held
        unsafe { env::set_var(key, value) };
    }

    /// Helper to remove an environment variable safely within tests.
    /// SAFETY: Must be called while holding ENV_TEST_MUTEX to prevent data races.
    unsafe fn remove_env(key: &str) {
        // SAFETY: Caller ensures ENV_TEST_MUTEX is held
        unsafe { env::remove_var(key) };
    }

    #[test]
    fn test_uses_param_when_provided() {
        let result = resolve_stall_secs(Some(2));
        assert_eq!(result, 2);
    }

    #[test]
    fn test_param_takes_priority_over_env() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        // SAFETY: Holding ENV_TEST_MUTEX, no concurrent env access
        unsafe {
            set_env(STALL_SECS_ENV_VAR, "30");
        }
        let result = resolve_stall_secs(Some(1));
        assert_eq!(result, 1);
        unsafe {
            remove_env(STALL_SECS_ENV_VAR);
        }
    }

    #[test]
    fn test_uses_env_when_no_param() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        // SAFETY: Holding ENV_TEST_MUTEX, no concurrent env access
        unsafe {
            set_env(STALL_SECS_ENV_VAR, "12");
        }
        let result = resolve_stall_secs(None);
        assert_eq!(result, 12);
        unsafe {
            remove_env(STALL_SECS_ENV_VAR);
        }
    }

    #[test]
    fn test_ignores_unparseable_env_value() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        // SAFETY: Holding ENV_TEST_MUTEX, no concurrent env access
        unsafe {
            set_env(STALL_SECS_ENV_VAR, "not-a-number");
        }
        let result = resolve_stall_secs(None);
        assert_eq!(result, DEFAULT_STALL_SECS);
        unsafe {
            remove_env(STALL_SECS_ENV_VAR);
        }
    }

    #[test]
    fn test_uses_default_when_nothing_set() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        // SAFETY: Holding ENV_TEST_MUTEX, no concurrent env access
        unsafe {
            remove_env(STALL_SECS_ENV_VAR);
        }
        let result = resolve_stall_secs(None);
        assert_eq!(result, DEFAULT_STALL_SECS);
    }
}
