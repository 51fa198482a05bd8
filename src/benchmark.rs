use std::fmt;
use std::ops::AddAssign;
use std::time::{Duration, Instant};

/// Stage of a blend call that a [`Benchmark`] attributes time to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Decode,
    Blend,
    Encode,
}

/// Wall-clock time accumulated per phase across one or more blend calls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Benchmark {
    pub decode: Duration,
    pub blend: Duration,
    pub encode: Duration,
}

impl Benchmark {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f`, charging its wall time to `phase`.
    pub fn time<T>(&mut self, phase: Phase, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let out = f();
        let elapsed = start.elapsed();
        match phase {
            Phase::Decode => self.decode += elapsed,
            Phase::Blend => self.blend += elapsed,
            Phase::Encode => self.encode += elapsed,
        }
        out
    }

    pub fn total(&self) -> Duration {
        self.decode + self.blend + self.encode
    }
}

impl AddAssign for Benchmark {
    fn add_assign(&mut self, rhs: Self) {
        self.decode += rhs.decode;
        self.blend += rhs.blend;
        self.encode += rhs.encode;
    }
}

impl fmt::Display for Benchmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn ms(d: Duration) -> f64 {
            d.as_secs_f64() * 1000.0
        }
        write!(
            f,
            "{:.2}ms (decode {:.2}ms, blend {:.2}ms, encode {:.2}ms)",
            ms(self.total()),
            ms(self.decode),
            ms(self.blend),
            ms(self.encode)
        )
    }
}

#[cfg(test)]
#[path = "../tests/unit/benchmark.rs"]
mod tests;
