//! 도메인 모델.

mod credential;
mod exchange;
mod trade;

pub use credential::Credential;
pub use exchange::Exchange;
pub use trade::{CanonicalTrade, INFO_UNAVAILABLE};
