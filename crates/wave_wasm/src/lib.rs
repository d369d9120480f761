//! WASM bridge between the wave chart UI and `wave_core`.
//!
//! The UI owns waves, groups, visibility and the epoch; it passes a snapshot
//! of them on every call and receives plain JS objects back.

mod engine;
mod shared;

pub use engine::WasmIntersectionEngine;

use shared::{utc_offset_from_js, ymd_from_js};
use std::sync::Once;
use wasm_bindgen::prelude::*;
use wave_core::phase::{phase_fraction, value_for_phase};
use wave_core::time::{DayKey, ONE_DAY_MS};

static LOGGING: Once = Once::new();

/// Routes `tracing` output to the browser console. Safe to call repeatedly.
#[wasm_bindgen]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    LOGGING.call_once(|| {
        tracing_wasm::set_as_global_default();
        tracing::info!("wave engine logging initialized");
    });
}

/// Phase in `[0, 1)` of a wave with `period` days at `instant`, measured
/// from `origin` (both in ms since the Unix epoch).
#[wasm_bindgen]
pub fn wave_phase_at(period: f64, origin: f64, instant: f64) -> Result<f64, JsValue> {
    if !(period.is_finite() && period > 0.0) {
        return Err(JsValue::from_str("Period must be positive."));
    }
    Ok(phase_fraction((instant - origin) / ONE_DAY_MS, period))
}

#[wasm_bindgen]
pub fn wave_value_at(
    period: f64,
    origin: f64,
    instant: f64,
    amplitude: f64,
) -> Result<f64, JsValue> {
    let phase = wave_phase_at(period, origin, instant)?;
    Ok(value_for_phase(amplitude, phase))
}

#[wasm_bindgen]
pub fn day_key_for(instant: f64, utc_offset_minutes: f64) -> Result<f64, JsValue> {
    let offset =
        utc_offset_from_js(utc_offset_minutes).map_err(|e| JsValue::from_str(&e.to_string()))?;
    DayKey::containing(instant, offset)
        .map(|day| day.0 as f64)
        .ok_or_else(|| JsValue::from_str("Instant must be finite."))
}

#[wasm_bindgen]
pub fn day_key_from_date(year: f64, month: u32, day: u32) -> Result<f64, JsValue> {
    ymd_from_js(year, month, day)
        .map(|key| key.0 as f64)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
