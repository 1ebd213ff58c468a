//! Configuration types for pullseq stages

/// How a probe size grows between rounds
#[derive(Debug, Clone, PartialEq)]
pub enum GrowthStrategy {
    Linear(usize),
    Exponential(f64),
    Fixed,
}

impl GrowthStrategy {
    /// Next probe size after `current`, never below 1
    pub fn grow(&self, current: usize) -> usize {
        let next = match self {
            GrowthStrategy::Linear(step) => current.saturating_add(*step),
            GrowthStrategy::Exponential(factor) => {
                let scaled = (current as f64 * factor).ceil();
                if scaled >= usize::MAX as f64 {
                    usize::MAX
                } else {
                    scaled as usize
                }
            }
            GrowthStrategy::Fixed => current,
        };
        next.max(1)
    }
}

/// Probe rounds used when a stage must find the end of an unknown-length
/// upstream without materializing it in one pull (zip, take-while, skip-while)
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    pub initial_size: usize,
    pub max_size: usize,
    pub growth: GrowthStrategy,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            initial_size: 8,
            max_size: 64 * 1024,
            growth: GrowthStrategy::Exponential(2.0),
        }
    }
}

impl ProbeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the first probe size
    pub fn initial_size(mut self, size: usize) -> Self {
        self.initial_size = size.max(1);
        self
    }

    /// Cap on a single probe round
    pub fn max_size(mut self, size: usize) -> Self {
        self.max_size = size.max(1);
        self
    }

    pub fn growth(mut self, growth: GrowthStrategy) -> Self {
        self.growth = growth;
        self
    }

    pub(crate) fn first(&self) -> usize {
        self.initial_size.clamp(1, self.max_size.max(1))
    }

    pub(crate) fn after(&self, current: usize) -> usize {
        self.growth.grow(current).min(self.max_size.max(1))
    }
}

/// Sizing of the membership map built by the eager dedup/dup strategy
#[derive(Debug, Clone)]
pub struct FastPathConfig {
    pub capacity_ratio: f64,
}

impl Default for FastPathConfig {
    fn default() -> Self {
        Self { capacity_ratio: 1.25 }
    }
}

impl FastPathConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn capacity_ratio(mut self, ratio: f64) -> Self {
        self.capacity_ratio = ratio;
        self
    }

    pub(crate) fn capacity_for(&self, len: usize) -> usize {
        let ratio = if self.capacity_ratio.is_finite() && self.capacity_ratio > 0.0 {
            self.capacity_ratio
        } else {
            1.0
        };
        (len as f64 * ratio).ceil() as usize
    }
}

/// Channel sink configuration
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// Buffer slots of the outbound channel
    pub capacity: usize,
    /// Elements pulled from upstream per round
    pub batch_size: usize,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            capacity: 1,
            batch_size: 1,
        }
    }
}

impl ChannelConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Same value for channel buffer and pull size
    pub fn buffered(size: usize) -> Self {
        Self::new().capacity(size).batch_size(size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exponential_growth_is_capped() {
        let cfg = ProbeConfig::new().initial_size(4).max_size(20);
        assert_eq!(cfg.first(), 4);
        assert_eq!(cfg.after(4), 8);
        assert_eq!(cfg.after(16), 20);
    }

    #[test]
    fn fixed_growth_keeps_size() {
        let cfg = ProbeConfig::new().growth(GrowthStrategy::Fixed).initial_size(3);
        assert_eq!(cfg.after(cfg.first()), 3);
    }

    #[test]
    fn fast_path_capacity() {
        assert_eq!(FastPathConfig::default().capacity_for(8), 10);
        assert_eq!(FastPathConfig::new().capacity_ratio(-1.0).capacity_for(8), 8);
    }
}
