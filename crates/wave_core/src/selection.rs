use crate::wave::{Group, Wave};

/// A wave is active when it is visible and at least one enabled group
/// contains it.
pub fn is_active(wave: &Wave, groups: &[Group]) -> bool {
    wave.visible && groups.iter().any(|group| group.enabled && group.contains(wave))
}

/// The waves to pair, in input order. With `only_active` unset every wave is
/// returned regardless of visibility or group state.
pub fn select_active_waves<'a>(
    waves: &'a [Wave],
    groups: &[Group],
    only_active: bool,
) -> Vec<&'a Wave> {
    if !only_active {
        return waves.iter().collect();
    }
    waves.iter().filter(|wave| is_active(wave, groups)).collect()
}
