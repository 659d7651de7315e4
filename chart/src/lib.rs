pub mod format;
pub mod renderer;
pub mod transform;

pub use format::CurrencyFormatter;
pub use renderer::{Chart, ChartConfig, ChartRenderer};
pub use transform::transform;
