use log::debug;

use super::pattern::Pattern;
use super::step::Step;
use crate::shared::NUM_PATTERNS;

/// One instrument lane: its patterns, which one plays, which one is queued,
/// and the deferred mute / pattern-ops flags.
#[derive(Clone, Debug)]
pub struct Track {
    track_num: usize,
    patterns: [Pattern; NUM_PATTERNS],
    current_pattern: usize,
    queued_pattern: Option<usize>,
    muted: bool,
    mute_armed: bool,
    pattern_ops_armed: bool,
}

impl Track {
    pub fn new(track_num: usize) -> Self {
        Self {
            track_num,
            patterns: std::array::from_fn(|_| Pattern::default()),
            current_pattern: 0,
            queued_pattern: None,
            muted: false,
            mute_armed: false,
            pattern_ops_armed: false,
        }
    }

    /// Advances the cursor; at the pattern boundary a queued switch takes over.
    pub fn do_step(&mut self) {
        let wrapped = self.patterns[self.current_pattern].advance();
        if wrapped {
            if let Some(next) = self.queued_pattern.take() {
                self.select_pattern(next);
                debug!("track {}: pattern {} committed", self.track_num, next);
            }
        }
    }

    pub fn current_step(&self) -> &Step {
        self.current_pattern().active_step()
    }

    pub fn current_step_mut(&mut self) -> &mut Step {
        self.current_pattern_mut().active_step_mut()
    }

    pub fn current_pattern(&self) -> &Pattern {
        &self.patterns[self.current_pattern]
    }

    pub fn current_pattern_mut(&mut self) -> &mut Pattern {
        &mut self.patterns[self.current_pattern]
    }

    pub fn current_pattern_index(&self) -> usize {
        self.current_pattern
    }

    pub fn queued_pattern(&self) -> Option<usize> {
        self.queued_pattern
    }

    pub fn pattern(&self, index: usize) -> &Pattern {
        &self.patterns[index % NUM_PATTERNS]
    }

    pub fn pattern_mut(&mut self, index: usize) -> &mut Pattern {
        &mut self.patterns[index % NUM_PATTERNS]
    }

    pub fn copy_pattern(&mut self, source: usize, target: usize) {
        let (source, target) = (source % NUM_PATTERNS, target % NUM_PATTERNS);
        if source == target {
            return;
        }
        let from = self.patterns[source].clone();
        self.patterns[target].copy_values_from(&from);
    }

    /// Queues `index`; it becomes current when the playing pattern wraps.
    pub fn switch_to_pattern(&mut self, index: usize) {
        self.queued_pattern = Some(index % NUM_PATTERNS);
    }

    /// Switches right away, dropping anything queued.
    pub fn select_pattern(&mut self, index: usize) {
        self.current_pattern = index % NUM_PATTERNS;
        self.queued_pattern = None;
        self.patterns[self.current_pattern].reset_cursor();
    }

    pub fn on_stop(&mut self) {
        if let Some(next) = self.queued_pattern.take() {
            self.current_pattern = next;
        }
        for pattern in &mut self.patterns {
            pattern.reset_cursor();
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn un_mute(&mut self) {
        self.muted = false;
    }

    pub fn is_mute_armed(&self) -> bool {
        self.mute_armed
    }

    pub fn toggle_mute_arm(&mut self) {
        self.mute_armed = !self.mute_armed;
    }

    pub fn activate_mute_arms(&mut self) {
        if self.mute_armed {
            self.muted = !self.muted;
            self.mute_armed = false;
            debug!("track {}: muted={}", self.track_num, self.muted);
        }
    }

    pub fn is_pattern_ops_armed(&self) -> bool {
        self.pattern_ops_armed
    }

    pub fn toggle_pattern_ops_arm(&mut self) {
        self.pattern_ops_armed = !self.pattern_ops_armed;
    }

    pub fn disarm_pattern_ops(&mut self) {
        self.pattern_ops_armed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queued_pattern_waits_for_wrap() {
        let mut track = Track::new(0);
        track.current_pattern_mut().set_track_length(4);
        track.do_step();
        track.switch_to_pattern(3);
        track.do_step();
        track.do_step();
        assert_eq!(track.current_pattern_index(), 0);
        assert_eq!(track.queued_pattern(), Some(3));
        track.do_step();
        assert_eq!(track.current_pattern_index(), 3);
        assert_eq!(track.current_pattern().current_step(), 0);
        assert_eq!(track.queued_pattern(), None);
    }

    #[test]
    fn test_mute_arm_commit() {
        let mut track = Track::new(1);
        track.toggle_mute_arm();
        assert!(!track.is_muted());
        track.activate_mute_arms();
        assert!(track.is_muted() && !track.is_mute_armed());
        track.activate_mute_arms();
        assert!(track.is_muted());
    }

    #[test]
    fn test_on_stop_rewinds_and_commits_queue() {
        let mut track = Track::new(2);
        track.do_step();
        track.do_step();
        track.switch_to_pattern(18);
        track.on_stop();
        assert_eq!(track.current_pattern_index(), 2);
        assert_eq!(track.current_pattern().current_step(), 0);
    }

    #[test]
    fn test_copy_pattern() {
        let mut track = Track::new(0);
        track.pattern_mut(0).step_mut(4).toggle_trigger_state();
        track.copy_pattern(0, 5);
        assert!(track.pattern(5).step(4).is_trigger_on());
    }
}
