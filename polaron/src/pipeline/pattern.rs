use super::step::Step;
use crate::shared::STEPS_PER_PATTERN;

/// 16 steps looped over `track_length` of them. `offset` rotates the grid at
/// read time only; the cursor itself always counts 0..track_length.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pattern {
    steps: [Step; STEPS_PER_PATTERN],
    track_length: usize,
    offset: usize,
    current_step: usize,
    pub auto_mutate: bool,
}

impl Default for Pattern {
    fn default() -> Self {
        Self {
            steps: [Step::default(); STEPS_PER_PATTERN],
            track_length: STEPS_PER_PATTERN,
            offset: 0,
            current_step: 0,
            auto_mutate: false,
        }
    }
}

impl Pattern {
    pub fn step(&self, index: usize) -> &Step {
        &self.steps[index % STEPS_PER_PATTERN]
    }

    pub fn step_mut(&mut self, index: usize) -> &mut Step {
        &mut self.steps[index % STEPS_PER_PATTERN]
    }

    pub fn steps(&self) -> &[Step; STEPS_PER_PATTERN] {
        &self.steps
    }

    pub fn track_length(&self) -> usize {
        self.track_length
    }

    pub fn set_track_length(&mut self, length: usize) {
        self.track_length = length.clamp(1, STEPS_PER_PATTERN);
        // park the cursor on the last step so the next advance wraps to 0
        if self.current_step >= self.track_length {
            self.current_step = self.track_length - 1;
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn set_offset(&mut self, offset: usize) {
        self.offset = offset.min(STEPS_PER_PATTERN);
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    /// Grid index the cursor currently reads, rotation applied.
    pub fn active_step_index(&self) -> usize {
        (self.current_step + self.offset) % STEPS_PER_PATTERN
    }

    pub fn active_step(&self) -> &Step {
        &self.steps[self.active_step_index()]
    }

    pub fn active_step_mut(&mut self) -> &mut Step {
        let index = self.active_step_index();
        &mut self.steps[index]
    }

    /// Moves the cursor one step. Returns true when it wrapped back to 0.
    pub fn advance(&mut self) -> bool {
        if self.current_step + 1 >= self.track_length {
            self.current_step = 0;
            true
        } else {
            self.current_step += 1;
            false
        }
    }

    pub fn reset_cursor(&mut self) {
        self.current_step = 0;
    }

    /// Arms plock recording on every step that currently triggers (and
    /// disarms it again on the second press).
    pub fn toggle_plock_mode(&mut self) {
        for step in self.steps.iter_mut().filter(|s| s.is_trigger_on()) {
            step.toggle_parameter_lock_record();
        }
    }

    pub fn turn_off_plock_mode(&mut self) {
        for step in &mut self.steps {
            step.set_parameter_lock_record(false);
        }
    }

    pub fn is_in_plock_mode(&self) -> bool {
        self.steps.iter().any(Step::is_parameter_lock_on)
    }

    /// Takes over the musical content of `source`; the cursor stays put.
    pub fn copy_values_from(&mut self, source: &Pattern) {
        for (target, from) in self.steps.iter_mut().zip(&source.steps) {
            target.copy_values_from(from);
        }
        self.offset = source.offset;
        self.auto_mutate = source.auto_mutate;
        self.set_track_length(source.track_length);
    }

    // bit i = step i triggers
    pub fn trigger_state(&self) -> u16 {
        self.mask(Step::is_trigger_on)
    }

    // bit i = step i records plocks
    pub fn plock_arm_state(&self) -> u16 {
        self.mask(Step::is_parameter_lock_on)
    }

    fn mask(&self, bit: impl Fn(&Step) -> bool) -> u16 {
        self.steps
            .iter()
            .enumerate()
            .filter(|(_, s)| bit(*s))
            .fold(0, |acc, (i, _)| acc | (1 << i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_wraps_at_track_length() {
        let mut p = Pattern::default();
        p.set_track_length(3);
        assert!(!p.advance());
        assert!(!p.advance());
        assert_eq!(p.current_step(), 2);
        assert!(p.advance());
        assert_eq!(p.current_step(), 0);
    }

    #[test]
    fn test_shrinking_length_below_cursor_wraps_next() {
        let mut p = Pattern::default();
        for _ in 0..10 {
            p.advance();
        }
        p.set_track_length(4);
        assert!(p.current_step() < p.track_length());
        assert!(p.advance());
        assert_eq!(p.current_step(), 0);
    }

    #[test]
    fn test_offset_rotates_reads_only() {
        let mut p = Pattern::default();
        p.set_offset(14);
        p.advance();
        p.advance();
        p.advance();
        assert_eq!(p.current_step(), 3);
        assert_eq!(p.active_step_index(), 1);
        p.set_offset(16);
        assert_eq!(p.active_step_index(), 3);
    }

    #[test]
    fn test_toggle_plock_mode_hits_triggered_steps() {
        let mut p = Pattern::default();
        p.step_mut(1).toggle_trigger_state();
        p.step_mut(7).toggle_trigger_state();
        p.toggle_plock_mode();
        assert!(p.step(1).is_parameter_lock_on());
        assert!(p.step(7).is_parameter_lock_on());
        assert!(!p.step(2).is_parameter_lock_on());
        assert!(p.is_in_plock_mode());
        assert_eq!(p.plock_arm_state(), 0b1000_0010);
        p.turn_off_plock_mode();
        assert!(!p.is_in_plock_mode());
        assert_eq!(p.trigger_state(), 0b1000_0010);
    }

    #[test]
    fn test_copy_keeps_cursor_in_range() {
        let mut source = Pattern::default();
        source.set_track_length(2);
        source.step_mut(0).toggle_trigger_state();
        let mut target = Pattern::default();
        for _ in 0..9 {
            target.advance();
        }
        target.copy_values_from(&source);
        assert_eq!(target.track_length(), 2);
        assert!(target.current_step() < 2);
        assert!(target.step(0).is_trigger_on());
    }
}
