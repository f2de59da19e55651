pub mod config;
pub mod handlers;
pub mod models;
pub mod utils;

pub use config::Settings;
pub use handlers::quote_calculate::calculate;
pub use models::{
    quote::{LineItem, Quote, QuoteResult, QuoteStatus},
    request::{CustomerType, PricingModel, PricingRequest},
};
