//! Synthetic price generators.

use clap::ValueEnum;
use rand::Rng;
use trading::traits::data_feed::PriceSource;

/// Which synthetic generator a publisher runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PriceModel {
    /// Deterministic `start + i * step`.
    Ramp,
    /// Multiplicative random walk of at most 1% per tick.
    RandomWalk,
}

impl PriceModel {
    pub fn build(self, start_price: f64, step: f64) -> Box<dyn PriceSource + Send> {
        match self {
            PriceModel::Ramp => Box::new(RampFeed::new(start_price, step)),
            PriceModel::RandomWalk => Box::new(RandomFeed::new(start_price)),
        }
    }
}

/// Produces `start, start + step, start + 2 * step, ...`.
pub struct RampFeed {
    start_price: f64,
    step: f64,
    count: u64,
}

impl RampFeed {
    pub fn new(start_price: f64, step: f64) -> Self {
        Self {
            start_price,
            step,
            count: 0,
        }
    }
}

impl PriceSource for RampFeed {
    fn next_price(&mut self) -> f64 {
        // Multiply instead of accumulating to avoid drift.
        let price = self.start_price + self.count as f64 * self.step;
        self.count += 1;
        price
    }
}

/// A simple random walk data generator.
pub struct RandomFeed {
    price: f64,
}

impl RandomFeed {
    pub fn new(start_price: f64) -> Self {
        Self { price: start_price }
    }
}

impl PriceSource for RandomFeed {
    fn next_price(&mut self) -> f64 {
        let mut rng = rand::thread_rng();
        // Random walk: +/- 1%
        let change_pct = rng.gen_range(-0.01..0.01);
        self.price *= 1.0 + change_pct;

        // Ensure price stays positive
        if self.price < 0.01 {
            self.price = 0.01;
        }
        self.price
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramp_starts_at_start_price() {
        let mut feed = RampFeed::new(100.0, 0.1);
        let prices: Vec<f64> = (0..3).map(|_| feed.next_price()).collect();
        assert_eq!(prices[0], 100.0);
        assert!((prices[1] - 100.1).abs() < 1e-9);
        assert!((prices[2] - 100.2).abs() < 1e-9);
    }

    #[test]
    fn random_walk_moves_at_most_one_percent() {
        let mut feed = RandomFeed::new(100.0);
        let mut last = 100.0;
        for _ in 0..1000 {
            let next = feed.next_price();
            assert!(next >= 0.01);
            assert!((next / last - 1.0).abs() <= 0.01 + 1e-12);
            last = next;
        }
    }

    #[test]
    fn model_selects_generator() {
        let mut ramp = PriceModel::Ramp.build(50.0, 1.0);
        assert_eq!(ramp.next_price(), 50.0);
        assert_eq!(ramp.next_price(), 51.0);
    }
}
