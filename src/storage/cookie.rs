use axum::http::{header, HeaderMap, HeaderValue};
use std::collections::HashMap;
use std::sync::Mutex;

use super::{Storage, StorageError};

/// Ten years; the preference is meant to outlive any session.
const COOKIE_MAX_AGE_SECS: u64 = 315_360_000;

/// Request-scoped storage backed by HTTP cookies.
///
/// Reads come from the request's `Cookie` headers; writes are queued as
/// `Set-Cookie` values for the response.
#[derive(Debug, Default)]
pub struct CookieStorage {
    values: Mutex<HashMap<String, String>>,
    pending: Mutex<Vec<String>>,
}

impl CookieStorage {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let values = headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|line| line.split(';'))
            .filter_map(|pair| {
                let (name, value) = pair.trim().split_once('=')?;
                Some((name.trim().to_string(), value.trim().trim_matches('"').to_string()))
            })
            .collect();

        Self {
            values: Mutex::new(values),
            pending: Mutex::new(Vec::new()),
        }
    }

    /// Drains the queued `Set-Cookie` header values.
    pub fn take_set_cookies(&self) -> Vec<HeaderValue> {
        std::mem::take(
            &mut *self
                .pending
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner()),
        )
        .into_iter()
        .filter_map(|cookie| HeaderValue::from_str(&cookie).ok())
        .collect()
    }

    fn queue(&self, cookie: String) {
        self.pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(cookie);
    }
}

fn is_cookie_safe(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

impl Storage for CookieStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if !is_cookie_safe(key) || !is_cookie_safe(value) {
            return Err(StorageError::InvalidValue {
                key: key.to_string(),
                reason: "cookie names and values must be plain tokens".to_string(),
            });
        }
        self.values
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.to_string(), value.to_string());
        self.queue(format!(
            "{key}={value}; Path=/; Max-Age={COOKIE_MAX_AGE_SECS}; SameSite=Lax"
        ));
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.values
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(key);
        self.queue(format!("{key}=; Path=/; Max-Age=0; SameSite=Lax"));
        Ok(())
    }
}
