/// Cuenta atrás de una subpregunta, en segundos.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    budget: u32,
    remaining: u32,
}

impl Countdown {
    pub fn start(budget: u32) -> Self {
        Self {
            budget,
            remaining: budget,
        }
    }

    /// Resta un segundo; devuelve `true` cuando se agota.
    pub fn tick(&mut self) -> bool {
        self.remaining = self.remaining.saturating_sub(1);
        self.is_expired()
    }

    pub fn is_expired(&self) -> bool {
        self.remaining == 0
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn budget(&self) -> u32 {
        self.budget
    }

    pub fn elapsed(&self) -> u32 {
        self.budget - self.remaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn countdown_expires_after_budget_ticks() {
        let mut c = Countdown::start(3);
        assert!(!c.tick());
        assert!(!c.tick());
        assert_eq!(c.elapsed(), 2);
        assert!(c.tick());
        assert!(c.tick());
        assert_eq!(c.remaining(), 0);
        assert_eq!(c.elapsed(), 3);
    }
}
