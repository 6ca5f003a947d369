use crate::panel::InputSurface;
use crate::shared::FunctionButton;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FunctionMode {
    DefaultMode,
    StartStop,
    TogglePlocks,
    LeaveTogglePlocks,
    ToggleMutes,
    LeaveToggleMutes,
    SetTrackLength,
    PatternOps,
    LeavePatternOps,
}

impl FunctionMode {
    // rose() -> pressed this tick, read() -> held, fell() -> released this tick.
    // First match wins.
    pub fn classify(surface: &InputSurface, track_or_step_button_pressed: bool) -> Self {
        let button = |b: FunctionButton| surface.function(b);

        if button(FunctionButton::StartStop).rose() {
            return FunctionMode::StartStop;
        }

        if button(FunctionButton::TogglePlock).read() {
            return FunctionMode::TogglePlocks;
        }
        // a bare tap (nothing else pressed while held) cancels all plocks
        if button(FunctionButton::TogglePlock).fell() && !track_or_step_button_pressed {
            return FunctionMode::LeaveTogglePlocks;
        }

        if button(FunctionButton::ToggleMute).read() {
            return FunctionMode::ToggleMutes;
        }
        if button(FunctionButton::ToggleMute).fell() {
            return FunctionMode::LeaveToggleMutes;
        }

        if button(FunctionButton::SetTrackLength).read() {
            return FunctionMode::SetTrackLength;
        }

        if button(FunctionButton::SetPattern).read() {
            return FunctionMode::PatternOps;
        }
        if button(FunctionButton::SetPattern).fell() {
            return FunctionMode::LeavePatternOps;
        }

        FunctionMode::DefaultMode
    }

    /// Track buttons select tracks and steer volume/pan.
    pub fn handles_track_selection(self) -> bool {
        !matches!(self, FunctionMode::ToggleMutes | FunctionMode::PatternOps)
    }

    /// Step buttons toggle triggers and copy steps.
    pub fn handles_step_triggers(self) -> bool {
        !matches!(
            self,
            FunctionMode::SetTrackLength | FunctionMode::TogglePlocks | FunctionMode::PatternOps
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::PanelState;

    fn surface_after(ticks: &[PanelState]) -> InputSurface {
        let mut surface = InputSurface::default();
        for panel in ticks {
            surface.poll(panel);
        }
        surface
    }

    #[test]
    fn test_idle_is_default() {
        let surface = surface_after(&[PanelState::default()]);
        assert_eq!(FunctionMode::classify(&surface, false), FunctionMode::DefaultMode);
    }

    #[test]
    fn test_start_stop_wins_over_held_modes() {
        let held = PanelState::default().with_function(FunctionButton::ToggleMute, true);
        let both = held.with_function(FunctionButton::StartStop, true);
        let surface = surface_after(&[held, both]);
        assert_eq!(FunctionMode::classify(&surface, false), FunctionMode::StartStop);
    }

    #[test]
    fn test_plock_release_depends_on_latch() {
        let held = PanelState::default().with_function(FunctionButton::TogglePlock, true);
        let surface = surface_after(&[held, PanelState::default()]);
        assert_eq!(FunctionMode::classify(&surface, false), FunctionMode::LeaveTogglePlocks);
        assert_eq!(FunctionMode::classify(&surface, true), FunctionMode::DefaultMode);
    }

    #[test]
    fn test_plock_outranks_mute() {
        let panel = PanelState::default()
            .with_function(FunctionButton::TogglePlock, true)
            .with_function(FunctionButton::ToggleMute, true);
        let surface = surface_after(&[panel]);
        assert_eq!(FunctionMode::classify(&surface, false), FunctionMode::TogglePlocks);
    }

    #[test]
    fn test_pattern_hold_and_release() {
        let held = PanelState::default().with_function(FunctionButton::SetPattern, true);
        let surface = surface_after(&[held]);
        assert_eq!(FunctionMode::classify(&surface, false), FunctionMode::PatternOps);
        let surface = surface_after(&[held, PanelState::default()]);
        assert_eq!(FunctionMode::classify(&surface, false), FunctionMode::LeavePatternOps);
    }

    #[test]
    fn test_button_routing_exclusions() {
        assert!(!FunctionMode::ToggleMutes.handles_track_selection());
        assert!(!FunctionMode::PatternOps.handles_step_triggers());
        assert!(FunctionMode::ToggleMutes.handles_step_triggers());
        assert!(FunctionMode::SetTrackLength.handles_track_selection());
    }
}
