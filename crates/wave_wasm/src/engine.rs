//! Intersection engine bindings.

use crate::shared::{day_key_from_js, utc_offset_from_js};
use js_sys::Float64Array;
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;
use wave_core::engine::IntersectionEngine;
use wave_core::settings::EngineSettings;
use wave_core::wave::{Wave, WaveSnapshot};

/// WASM-exported wrapper around the day intersection engine.
/// One instance per chart; the cache lives inside it.
#[wasm_bindgen]
pub struct WasmIntersectionEngine {
    engine: IntersectionEngine,
}

fn decode_snapshot(snapshot: JsValue) -> Result<WaveSnapshot, JsValue> {
    from_value(snapshot).map_err(|e| JsValue::from_str(&format!("Invalid wave snapshot: {}", e)))
}

fn decode_wave(wave: JsValue) -> Result<Wave, JsValue> {
    from_value(wave).map_err(|e| JsValue::from_str(&format!("Invalid wave: {}", e)))
}

fn encode<T: serde::Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    to_value(value).map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

#[wasm_bindgen]
impl WasmIntersectionEngine {
    /// `settings` may be `undefined`, or a partial settings object whose
    /// missing fields take their defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(settings: JsValue) -> Result<WasmIntersectionEngine, JsValue> {
        console_error_panic_hook::set_once();

        let settings: EngineSettings = if settings.is_undefined() || settings.is_null() {
            EngineSettings::default()
        } else {
            from_value(settings)
                .map_err(|e| JsValue::from_str(&format!("Invalid engine settings: {}", e)))?
        };
        let engine = IntersectionEngine::new(settings)
            .map_err(|e| JsValue::from_str(&format!("Engine setup failed: {}", e)))?;
        Ok(WasmIntersectionEngine { engine })
    }

    pub fn compute_for_day(&self, day_key: f64, snapshot: JsValue) -> Result<JsValue, JsValue> {
        let day = day_key_from_js(day_key).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let snapshot = decode_snapshot(snapshot)?;
        let intersections = self.engine.compute_intersections_for_day(day, &snapshot);
        encode(&*intersections)
    }

    /// Just the instants of `compute_for_day`, for marker rendering.
    pub fn intersection_times(
        &self,
        day_key: f64,
        snapshot: JsValue,
    ) -> Result<Float64Array, JsValue> {
        let day = day_key_from_js(day_key).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let snapshot = decode_snapshot(snapshot)?;
        let times: Vec<f64> = self
            .engine
            .compute_intersections_for_day(day, &snapshot)
            .iter()
            .map(|hit| hit.time)
            .collect();
        Ok(Float64Array::from(times.as_slice()))
    }

    pub fn compute_for_instant(&self, instant: f64, snapshot: JsValue) -> Result<JsValue, JsValue> {
        let snapshot = decode_snapshot(snapshot)?;
        let intersections = self
            .engine
            .compute_intersections_for_instant(instant, &snapshot)
            .map_err(|e| JsValue::from_str(&format!("Intersection computation failed: {}", e)))?;
        encode(&*intersections)
    }

    pub fn pair_intersections(
        &self,
        wave_a: JsValue,
        wave_b: JsValue,
        day_key: f64,
        epoch: f64,
    ) -> Result<JsValue, JsValue> {
        let day = day_key_from_js(day_key).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let a = decode_wave(wave_a)?;
        let b = decode_wave(wave_b)?;
        let intersections = self
            .engine
            .pair_intersections(&a, &b, day, epoch)
            .map_err(|e| JsValue::from_str(&format!("Pair intersection failed: {}", e)))?;
        encode(&intersections)
    }

    pub fn invalidate_cache(&self) {
        self.engine.invalidate_cache();
    }

    pub fn set_only_active_mode(&mut self, only_active: bool) {
        self.engine.set_only_active_mode(only_active);
    }

    pub fn only_active(&self) -> bool {
        self.engine.only_active()
    }

    pub fn set_utc_offset_minutes(&mut self, minutes: f64) -> Result<(), JsValue> {
        let minutes = utc_offset_from_js(minutes).map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.engine
            .set_utc_offset_minutes(minutes)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn stats(&self) -> Result<JsValue, JsValue> {
        encode(&self.engine.stats())
    }

    pub fn cached_days(&self) -> Vec<f64> {
        self.engine
            .cached_days()
            .into_iter()
            .map(|day| day.0 as f64)
            .collect()
    }
}

