//! Setting value validation.

use regex::Regex;
use std::sync::LazyLock;

static RE_RECITER_KEY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^0[1-5]$").unwrap());

/// Validate a setting value. Returns `Ok(())` if valid, or an error message.
pub fn validate_setting(key: &str, value: &str) -> Result<(), String> {
    match key {
        super::API_BASE | super::AUDIO_CDN => validate_http_url(value)?,
        super::REQUEST_TIMEOUT_SECS => validate_int_range(value, 1, 120)?,
        super::CACHE_TTL_SECS => validate_int_range(value, 0, 86_400)?,
        super::CACHE_CAPACITY => validate_int_range(value, 1, 10_000)?,
        super::DEFAULT_RECITER => {
            if !RE_RECITER_KEY.is_match(value) {
                return Err("must be a reciter key from 01 to 05".into());
            }
        }
        super::DATA_DIR => {
            if value.trim().is_empty() {
                return Err("must not be empty".into());
            }
        }
        _ => {}
    }
    Ok(())
}

fn validate_http_url(value: &str) -> Result<(), String> {
    let url = url::Url::parse(value).map_err(|e| format!("invalid URL: {e}"))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err("must be an http or https URL".into());
    }
    Ok(())
}

fn validate_int_range(value: &str, min: i64, max: i64) -> Result<(), String> {
    let v: i64 = value.parse().map_err(|_| "must be an integer")?;
    if v < min || v > max {
        return Err(format!("must be between {min} and {max}"));
    }
    Ok(())
}
