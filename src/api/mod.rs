pub mod dto;
pub mod summary;

pub use dto::{AssetDto, UserDto};
pub use summary::{summarize, CurrencyTotals, PortfolioSummary};
