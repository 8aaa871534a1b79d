//! Defines the `PriceSource` trait for price generation.
//!
//! A publisher owns exactly one source for its symbol. Swapping the synthetic
//! generators for a real feed only requires another implementation.

/// A component that produces the next price for a single symbol.
///
/// # Examples
///
/// ```
/// use trading::traits::data_feed::PriceSource;
///
/// struct Constant(f64);
///
/// impl PriceSource for Constant {
///     fn next_price(&mut self) -> f64 {
///         self.0
///     }
/// }
///
/// assert_eq!(Constant(42.0).next_price(), 42.0);
/// ```
pub trait PriceSource {
    /// Advances the source and returns the new price.
    fn next_price(&mut self) -> f64;
}

impl PriceSource for Box<dyn PriceSource + Send> {
    fn next_price(&mut self) -> f64 {
        (**self).next_price()
    }
}
