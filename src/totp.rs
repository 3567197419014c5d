use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::base32;
use crate::error::Result;
use crate::hotp::{compute_code, DIGITS};

// TOTP https://datatracker.ietf.org/doc/html/rfc6238

// time-based moving factor based on system time
pub const TIME_STEP: u64 = 30;

pub trait GetTime: Send + Sync {
    fn get_now(&self) -> SystemTime;
}

pub struct Clock {}

impl Clock {
    pub fn new() -> Self {
        Clock {}
    }
}

impl GetTime for Clock {
    fn get_now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// A code derived for one entry at one instant. Never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedCode {
    pub code: String,
    pub expires_in: u64,
    pub next_code: String,
}

/// Whole seconds since the epoch; instants before the epoch count as 0.
pub fn unix_seconds(at: SystemTime) -> u64 {
    at.duration_since(UNIX_EPOCH).unwrap_or_default().as_secs()
}

pub fn moving_factor(at: SystemTime) -> u64 {
    unix_seconds(at) / TIME_STEP
}

pub fn current_code(key: &[u8], at: SystemTime) -> Result<String> {
    compute_code(key, moving_factor(at), DIGITS)
}

/// Seconds left in the window containing `at`, in `1..=30`. A window that
/// starts exactly at `at` has all 30 seconds left.
pub fn seconds_remaining(at: SystemTime) -> u64 {
    TIME_STEP - unix_seconds(at) % TIME_STEP
}

pub fn next_code(key: &[u8], at: SystemTime) -> Result<String> {
    current_code(key, at + Duration::from_secs(seconds_remaining(at)))
}

/// Decodes a stored secret and derives the current and next codes for `at`.
pub fn derive(secret: &str, at: SystemTime) -> Result<DerivedCode> {
    let key = base32::decode(secret)?;

    Ok(DerivedCode {
        code: current_code(&key, at)?,
        expires_in: seconds_remaining(at),
        next_code: next_code(&key, at)?,
    })
}
