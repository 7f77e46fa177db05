use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Call count and cumulative wall time for one named section.
#[derive(Clone, Copy, Debug, Default)]
pub struct SectionStats {
    pub calls: u64,
    pub total: Duration,
}

impl SectionStats {
    pub fn mean(&self) -> Duration {
        if self.calls == 0 {
            Duration::ZERO
        } else {
            self.total / self.calls as u32
        }
    }
}

/// Scoped profiler for the model computations. Only fed when the
/// `profiling` feature is on.
#[derive(Default)]
pub struct Profiler {
    pub sections: HashMap<&'static str, SectionStats>,
}

impl Profiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, name: &'static str, elapsed: Duration) {
        let s = self.sections.entry(name).or_default();
        s.calls += 1;
        s.total += elapsed;
    }

    /// Sections sorted by total time, slowest first.
    pub fn report_sorted(&self) -> Vec<(&'static str, SectionStats)> {
        let mut v: Vec<_> = self.sections.iter().map(|(n, s)| (*n, *s)).collect();
        v.sort_by(|a, b| b.1.total.cmp(&a.1.total));
        v
    }

    /// Dump the report through the `log` facade and reset.
    pub fn log_and_clear(&mut self) {
        for (name, stats) in self.report_sorted() {
            log::info!(
                "{:<24} calls={:<6} total={:?} mean={:?}",
                name,
                stats.calls,
                stats.total,
                stats.mean()
            );
        }
        self.sections.clear();
    }
}

#[cfg_attr(not(feature = "profiling"), allow(dead_code))]
pub struct ProfilerGuard {
    name: &'static str,
    start: Instant,
}

/// Start a profiling section; the guard records into the global profiler on drop.
pub fn start(name: &'static str) -> ProfilerGuard {
    ProfilerGuard { name, start: Instant::now() }
}

#[cfg(feature = "profiling")]
impl Drop for ProfilerGuard {
    fn drop(&mut self) {
        crate::PROFILER.lock().record(self.name, self.start.elapsed());
    }
}

/// Profile the enclosing scope when the `profiling` feature is enabled.
#[macro_export]
macro_rules! profile_scope {
    ($name:expr) => {
        #[cfg(feature = "profiling")]
        let _guard = $crate::profiler::start($name);
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_calls_and_sorts_by_total() {
        let mut p = Profiler::new();
        p.record("fast", Duration::from_millis(1));
        p.record("slow", Duration::from_millis(10));
        p.record("fast", Duration::from_millis(3));
        let report = p.report_sorted();
        assert_eq!(report[0].0, "slow");
        assert_eq!(report[1].1.calls, 2);
        assert_eq!(report[1].1.mean(), Duration::from_millis(2));
        p.log_and_clear();
        assert!(p.sections.is_empty());
    }
}
