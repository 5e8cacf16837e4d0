// Timer that accumulates elapsed time
// Counts up from 0 towards a limit

#[derive(Debug, Clone)]
pub struct Timer {
    pub limit: f32,
    pub value: f32,
}

impl Timer {
    /// Create a stopped timer at zero
    pub fn new(limit: f32) -> Self {
        Self { limit, value: 0.0 }
    }

    /// Returns true once the accumulated time is strictly past the limit
    pub fn is_expired(&self) -> bool {
        self.value > self.limit
    }

    /// Accumulate dt (delta time)
    pub fn update(&mut self, dt: f32) {
        self.value += dt;
    }

    pub fn reset(&mut self) {
        self.value = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expires_strictly_after_limit() {
        let mut timer = Timer::new(0.5);
        timer.update(0.25);
        timer.update(0.25);
        assert!(!timer.is_expired(), "reaching the limit exactly is not expiry");
        timer.update(0.125);
        assert!(timer.is_expired());
        timer.reset();
        assert_eq!(timer.value, 0.0);
    }
}
