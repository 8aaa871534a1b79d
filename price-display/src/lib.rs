//! Display Consumer: purely observational view of the aggregated channel.

pub mod display;

pub use display::PriceDisplay;
