//! Option chain types and forecast-driven screening

mod contract;
mod filter;

pub use contract::{OptionContract, OptionType, SelectedOption};
pub use filter::select;
