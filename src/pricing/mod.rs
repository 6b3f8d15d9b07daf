pub mod european;
pub mod futures;
pub mod payoff;

pub use crate::core::OptionType;
pub use european::{BlackScholesModel, Greeks};
pub use futures::{ArbitrageReport, FuturesModel};
