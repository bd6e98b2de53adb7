mod price;
mod secret;

pub mod op;

pub use price::{Price, PriceConversionError};
pub use secret::Secret;
