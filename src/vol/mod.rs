pub mod implied;

pub use implied::{implied_volatility, ImpliedVolOptions};
