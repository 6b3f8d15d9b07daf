//! Leveraged trading strategies: long/short books, pairs trading, and
//! leverage scenario analysis. The strategy types share the borrowing
//! cost calculation in `leverage` by composition.

pub mod leverage;
pub mod longshort;
pub mod pairs;

pub use leverage::{
    borrowing_cost, leverage_scenarios, leveraged_return, margin_call_price, LeverageScenario,
};
pub use longshort::{LongShortStrategy, MarketExposure, Position, PositionsValue};
pub use pairs::{spread_zscore, Pair, PairsStrategy, SpreadReport};
