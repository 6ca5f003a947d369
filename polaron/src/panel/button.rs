// Edge detection over an already debounced button line. The scanner hands us
// the settled level once per tick; rose/fell are valid for exactly that tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Button {
    down: bool,
    was_down: bool,
}

impl Button {
    pub fn update(&mut self, down: bool) {
        self.was_down = self.down;
        self.down = down;
    }

    /// Currently held.
    pub fn read(&self) -> bool {
        self.down
    }

    /// Pressed this tick.
    pub fn rose(&self) -> bool {
        self.down && !self.was_down
    }

    /// Released this tick.
    pub fn fell(&self) -> bool {
        !self.down && self.was_down
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_last_one_tick() {
        let mut b = Button::default();
        b.update(true);
        assert!(b.rose() && b.read() && !b.fell());
        b.update(true);
        assert!(!b.rose() && b.read());
        b.update(false);
        assert!(b.fell() && !b.read());
        b.update(false);
        assert!(!b.fell());
    }
}
