//! Rule-based performance classification
//!
//! Every statistics record (a whole cell or a single line) is reduced to a
//! fully defaulted [`ClassifierInput`] once, then run through a fixed decision
//! table. Rules overlap, so the order below is significant: first match wins.

use crate::report::structs::{CellStats, LineStats};
use super::category::Category;

/// Share of total runtime above which a region is performance critical
pub const CRITICAL_PERCENT_THRESHOLD: f64 = 30.0;
/// Average raw time per hit above which a region is CPU bound (1 ms once scaled)
pub const CPU_AVG_TIME_THRESHOLD: f64 = 1000.0;
/// Hit count above which a cheap region is considered a hot loop
pub const LOOP_HITS_THRESHOLD: u64 = 10_000;
/// Average raw time per hit below which a heavily hit region is considered cheap
pub const LOOP_AVG_TIME_CEILING: f64 = 100.0;
/// Memory growth (MB) above which a region is memory bound
pub const MEMORY_DELTA_THRESHOLD_MB: f64 = 0.3;

/// Aggregate statistics the classifier looks at, with absent fields already zeroed
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClassifierInput {
    pub percent_time: f64,
    pub total_time: f64,
    pub total_hits: u64,
    pub memory_delta_mb: f64,
}

impl ClassifierInput {
    /// Average raw time per hit; a zero hit count divides by one
    pub fn avg_time_per_hit(&self) -> f64 {
        self.total_time / self.total_hits.max(1) as f64
    }
}

impl From<&CellStats> for ClassifierInput {
    fn from(stats: &CellStats) -> Self {
        Self {
            percent_time: stats.percent_time.unwrap_or(0.0),
            total_time: stats.total_time.unwrap_or(0.0),
            total_hits: stats.total_hits.unwrap_or(0),
            memory_delta_mb: stats.memory_delta_mb.unwrap_or(0.0),
        }
    }
}

impl From<&LineStats> for ClassifierInput {
    fn from(stats: &LineStats) -> Self {
        Self {
            percent_time: stats.percent.unwrap_or(0.0),
            total_time: stats.time.unwrap_or(0.0),
            total_hits: stats.hits.unwrap_or(0),
            memory_delta_mb: stats.memory_delta_mb.unwrap_or(0.0),
        }
    }
}

/// Assign exactly one category to a statistics record
pub fn classify(input: &ClassifierInput) -> Category {
    if input.percent_time > CRITICAL_PERCENT_THRESHOLD {
        return Category::PerformanceCritical;
    }

    let avg_time_per_hit = input.avg_time_per_hit();
    if avg_time_per_hit > CPU_AVG_TIME_THRESHOLD {
        Category::CpuIntensive
    } else if input.total_hits > LOOP_HITS_THRESHOLD && avg_time_per_hit < LOOP_AVG_TIME_CEILING {
        Category::LoopIntensive
    } else if input.memory_delta_mb > MEMORY_DELTA_THRESHOLD_MB {
        Category::MemoryIntensive
    } else {
        Category::Normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_rule_takes_precedence() {
        let input = ClassifierInput {
            percent_time: 35.0,
            total_time: 5_000_000.0,
            total_hits: 50_000,
            memory_delta_mb: 12.0,
        };
        assert_eq!(classify(&input), Category::PerformanceCritical);
    }

    #[test]
    fn test_cpu_intensive_single_hit() {
        let input = ClassifierInput {
            total_time: 5000.0,
            total_hits: 1,
            ..Default::default()
        };
        assert_eq!(classify(&input), Category::CpuIntensive);
    }

    #[test]
    fn test_loop_intensive() {
        let input = ClassifierInput {
            total_time: 500.0,
            total_hits: 20_000,
            ..Default::default()
        };
        assert!(input.avg_time_per_hit() < LOOP_AVG_TIME_CEILING);
        assert_eq!(classify(&input), Category::LoopIntensive);
    }

    #[test]
    fn test_memory_intensive() {
        let input = ClassifierInput {
            total_time: 50.0,
            total_hits: 3,
            memory_delta_mb: 0.5,
            ..Default::default()
        };
        assert_eq!(classify(&input), Category::MemoryIntensive);
    }

    #[test]
    fn test_all_zero_is_normal() {
        assert_eq!(classify(&ClassifierInput::default()), Category::Normal);
    }

    #[test]
    fn test_zero_hits_divides_by_one() {
        let input = ClassifierInput {
            total_time: 1500.0,
            total_hits: 0,
            ..Default::default()
        };
        assert_eq!(input.avg_time_per_hit(), 1500.0);
        assert_eq!(classify(&input), Category::CpuIntensive);
    }

    #[test]
    fn test_thresholds_are_strict() {
        let at_percent = ClassifierInput { percent_time: 30.0, ..Default::default() };
        assert_eq!(classify(&at_percent), Category::Normal);

        let at_cpu = ClassifierInput { total_time: 1000.0, total_hits: 1, ..Default::default() };
        assert_eq!(classify(&at_cpu), Category::Normal);

        let at_hits = ClassifierInput { total_time: 10.0, total_hits: 10_000, ..Default::default() };
        assert_eq!(classify(&at_hits), Category::Normal);

        let at_memory = ClassifierInput { memory_delta_mb: 0.3, ..Default::default() };
        assert_eq!(classify(&at_memory), Category::Normal);
    }

    #[test]
    fn test_line_stats_conversion_defaults() {
        let line = LineStats {
            time: Some(2500.0),
            ..Default::default()
        };
        let input = ClassifierInput::from(&line);
        assert_eq!(input.total_hits, 0);
        assert_eq!(input.percent_time, 0.0);
        assert_eq!(classify(&input), Category::CpuIntensive);
    }
}
