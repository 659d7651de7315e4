mod preferences;
mod price;

pub use preferences::Preferences;
pub use price::{ChartDataset, CurrencyPair, PriceObservation};
