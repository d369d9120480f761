//! Day intersection engine.
//!
//! Ties the pipeline together: resolve the active waves, consult the cache,
//! and on a miss run candidate generation, Newton refinement and validation
//! for every unordered pair before caching the merged, time-ordered list.

use crate::cache::{DayIntersections, IntersectionCache};
use crate::candidates::{generate_candidates, SolutionFamily};
use crate::phase::PhaseModel;
use crate::refine::refine_root;
use crate::selection::select_active_waves;
use crate::settings::EngineSettings;
use crate::time::{DayKey, DayWindow};
use crate::validate::{coincident_root, validate_root, Intersection, PairAccumulator};
use crate::wave::{Wave, WaveSnapshot};
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, trace, warn};

/// Counters exposed for instrumentation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineStats {
    /// Days computed from scratch.
    pub computations: usize,
    pub cache_hits: usize,
    pub cache_misses: usize,
    /// Wave pairs run through the candidate generator.
    pub candidate_generations: usize,
    pub reentrant_calls: usize,
}

#[derive(Debug, Default)]
struct Counters {
    computations: AtomicUsize,
    cache_hits: AtomicUsize,
    cache_misses: AtomicUsize,
    candidate_generations: AtomicUsize,
    reentrant_calls: AtomicUsize,
}

impl Counters {
    fn bump(counter: &AtomicUsize) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> EngineStats {
        EngineStats {
            computations: self.computations.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            candidate_generations: self.candidate_generations.load(Ordering::Relaxed),
            reentrant_calls: self.reentrant_calls.load(Ordering::Relaxed),
        }
    }
}

/// Marks a computation in progress; released on drop.
struct ComputeGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> ComputeGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for ComputeGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

#[derive(Debug)]
pub struct IntersectionEngine {
    settings: EngineSettings,
    only_active: bool,
    cache: Mutex<IntersectionCache>,
    busy: AtomicBool,
    counters: Counters,
}

impl IntersectionEngine {
    pub fn new(settings: EngineSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            cache: Mutex::new(IntersectionCache::new(settings.cache_capacity)),
            settings,
            only_active: true,
            busy: AtomicBool::new(false),
            counters: Counters::default(),
        })
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn only_active(&self) -> bool {
        self.only_active
    }

    pub fn set_only_active_mode(&mut self, only_active: bool) {
        if self.only_active != only_active {
            debug!(only_active, "active-wave filter changed");
        }
        self.only_active = only_active;
        self.invalidate_cache();
    }

    pub fn set_utc_offset_minutes(&mut self, minutes: i32) -> Result<()> {
        let mut settings = self.settings;
        settings.utc_offset_minutes = minutes;
        settings.validate()?;
        self.settings = settings;
        self.invalidate_cache();
        Ok(())
    }

    /// Drops every cached day. Call after any change to wave periods, group
    /// membership or enablement, visibility, or the epoch.
    pub fn invalidate_cache(&self) {
        self.lock_cache().clear();
    }

    pub fn stats(&self) -> EngineStats {
        self.counters.snapshot()
    }

    /// Days currently resident in the cache, oldest first.
    pub fn cached_days(&self) -> Vec<DayKey> {
        self.lock_cache().days()
    }

    pub fn phase_model(&self, epoch: f64) -> PhaseModel {
        PhaseModel::new(epoch, self.settings.amplitude)
    }

    pub fn day_window(&self, day: DayKey) -> DayWindow {
        day.window(self.settings.utc_offset_minutes)
    }

    /// All intersections between active waves on `day`, ordered by time.
    ///
    /// A repeated request under unchanged inputs returns the cached list
    /// itself. A call made while another computation on this engine is still
    /// running returns an empty list and leaves the cache untouched.
    pub fn compute_intersections_for_day(
        &self,
        day: DayKey,
        snapshot: &WaveSnapshot,
    ) -> DayIntersections {
        let Some(_guard) = ComputeGuard::acquire(&self.busy) else {
            Counters::bump(&self.counters.reentrant_calls);
            warn!(day = day.0, "intersection computation already in progress");
            return Arc::from(Vec::new());
        };

        let active = self.eligible_waves(snapshot);
        let fingerprint = self.fingerprint(snapshot.epoch, &active);

        {
            let mut cache = self.lock_cache();
            if cache.reconcile(fingerprint) {
                debug!("wave inputs changed, cached days dropped");
            }
            if let Some(hit) = cache.get(day) {
                Counters::bump(&self.counters.cache_hits);
                trace!(day = day.0, count = hit.len(), "intersection cache hit");
                return hit;
            }
        }
        Counters::bump(&self.counters.cache_misses);

        let result: DayIntersections = self.compute_day(day, snapshot.epoch, &active).into();
        self.lock_cache().put(day, Arc::clone(&result));
        result
    }

    /// Like [`Self::compute_intersections_for_day`] for the day containing
    /// `instant` in the configured zone.
    pub fn compute_intersections_for_instant(
        &self,
        instant: f64,
        snapshot: &WaveSnapshot,
    ) -> Result<DayIntersections> {
        let day = DayKey::containing(instant, self.settings.utc_offset_minutes)
            .ok_or_else(|| anyhow!("Instant {} does not map to a calendar day.", instant))?;
        Ok(self.compute_intersections_for_day(day, snapshot))
    }

    /// Intersections of a single pair on `day`, bypassing the cache and the
    /// active-wave filter.
    pub fn pair_intersections(
        &self,
        a: &Wave,
        b: &Wave,
        day: DayKey,
        epoch: f64,
    ) -> Result<Vec<Intersection>> {
        a.validate()?;
        b.validate()?;
        let model = self.phase_model(epoch);
        Ok(self.intersect_pair(&model, a, b, &self.day_window(day)))
    }

    fn lock_cache(&self) -> MutexGuard<'_, IntersectionCache> {
        // The cache is a memo; a panic elsewhere cannot leave it inconsistent.
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn eligible_waves<'a>(&self, snapshot: &'a WaveSnapshot) -> Vec<&'a Wave> {
        select_active_waves(&snapshot.waves, &snapshot.groups, self.only_active)
            .into_iter()
            .filter(|wave| match wave.validate() {
                Ok(()) => true,
                Err(err) => {
                    warn!(%err, "skipping invalid wave");
                    false
                }
            })
            .collect()
    }

    fn fingerprint(&self, epoch: f64, active: &[&Wave]) -> u64 {
        let mut hasher = DefaultHasher::new();
        epoch.to_bits().hash(&mut hasher);
        self.only_active.hash(&mut hasher);
        self.settings.utc_offset_minutes.hash(&mut hasher);
        for wave in active {
            wave.id.hash(&mut hasher);
            wave.period.to_bits().hash(&mut hasher);
            wave.origin.map(f64::to_bits).hash(&mut hasher);
        }
        hasher.finish()
    }

    fn compute_day(&self, day: DayKey, epoch: f64, active: &[&Wave]) -> Vec<Intersection> {
        Counters::bump(&self.counters.computations);
        if active.len() < 2 {
            debug!(day = day.0, waves = active.len(), "fewer than two active waves");
            return Vec::new();
        }

        let model = self.phase_model(epoch);
        let window = self.day_window(day);
        let mut merged = Vec::new();
        for (i, a) in active.iter().enumerate() {
            for b in &active[i + 1..] {
                merged.extend(self.intersect_pair(&model, a, b, &window));
            }
        }
        merged.sort_by(|x, y| x.time.total_cmp(&y.time));

        debug!(
            day = day.0,
            waves = active.len(),
            intersections = merged.len(),
            "computed day intersections"
        );
        merged
    }

    fn intersect_pair(
        &self,
        model: &PhaseModel,
        a: &Wave,
        b: &Wave,
        window: &DayWindow,
    ) -> Vec<Intersection> {
        Counters::bump(&self.counters.candidate_generations);
        let solver = &self.settings.solver;
        let length = window.length_days();
        let eq_a = model.equation(a, window.start);
        let eq_b = model.equation(b, window.start);

        let set = generate_candidates(&eq_a, &eq_b, length, solver);
        if set.truncated {
            warn!(
                wave_a = %a.id,
                wave_b = %b.id,
                cap = solver.max_candidates_per_family,
                "candidate enumeration truncated"
            );
        }

        let mut accepted = PairAccumulator::new(solver);
        for candidate in set.candidates {
            if candidate.family == SolutionFamily::Coincident {
                accepted.push(coincident_root(&eq_a, &eq_b, candidate.offset));
                continue;
            }
            let offset = match refine_root(&eq_a, &eq_b, candidate.offset, length, solver) {
                Ok(refined) => refined.offset,
                Err(reason) => {
                    trace!(wave_a = %a.id, wave_b = %b.id, %reason, "candidate dropped");
                    continue;
                }
            };
            match validate_root(&eq_a, &eq_b, offset, candidate.family, solver) {
                Some(root) => {
                    accepted.push(root);
                }
                None => trace!(wave_a = %a.id, wave_b = %b.id, offset, "root failed validation"),
            }
        }

        accepted
            .finish()
            .into_iter()
            .map(|root| Intersection {
                time: window.instant_at(root.offset),
                wave_a: a.id.clone(),
                wave_b: b.id.clone(),
                value: root.value,
                exact: root.exact,
            })
            .collect()
    }
}
