mod app;
mod args;
pub mod catalog;
mod config;
pub mod form;
pub mod quote;
pub mod submit;
mod trade;
pub mod ui;
mod utils;

pub use app::Application;
pub use catalog::price_feed::{HttpPriceSource, PriceSource, RawPriceRecord};
pub use catalog::{Catalog, CatalogError, CatalogLoader, CatalogStatus, EnrichedToken};
pub use config::{CatalogConfig, QuoteConfig, TradeConfig};
pub use form::session::SwapSession;
pub use form::{reduce, FormAction, FormState, TradeType};
pub use quote::{compute_quote, OrderType, QuoteRequest, QuoteResult};
pub use submit::{Receipt, SimulatedSubmitter, SubmissionError, SubmitConfig, SwapRequest, SwapSubmitter};
pub use trade::run_trade;
pub use ui::io_input::{with_input_source, InputSource, StdinInputSource, TradeCommand, VecInputSource};
