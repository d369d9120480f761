//! Argument conversion shared by the exported bindings.
//!
//! JS hands every number over as an `f64`; these helpers check that integral
//! arguments really are integral before they reach the core crate.

use anyhow::{bail, Result};
use wave_core::time::DayKey;

pub(crate) fn day_key_from_js(day_key: f64) -> Result<DayKey> {
    if !day_key.is_finite() || day_key.fract() != 0.0 {
        bail!("Day key must be an integer (got {}).", day_key);
    }
    if day_key.abs() > 1e12 {
        bail!("Day key {} is out of range.", day_key);
    }
    Ok(DayKey(day_key as i64))
}

pub(crate) fn utc_offset_from_js(minutes: f64) -> Result<i32> {
    if !minutes.is_finite() || minutes.fract() != 0.0 {
        bail!("UTC offset must be a whole number of minutes (got {}).", minutes);
    }
    if minutes.abs() > f64::from(18 * 60) {
        bail!("UTC offset must be within ±18 hours (got {} minutes).", minutes);
    }
    Ok(minutes as i32)
}

pub(crate) fn ymd_from_js(year: f64, month: u32, day: u32) -> Result<DayKey> {
    if !year.is_finite() || year.fract() != 0.0 {
        bail!("Year must be an integer (got {}).", year);
    }
    DayKey::from_ymd(year as i64, month, day)
        .ok_or_else(|| anyhow::anyhow!("{}-{:02}-{:02} is not a calendar date.", year, month, day))
}
