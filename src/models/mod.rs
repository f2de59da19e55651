pub mod quote;
pub mod request;
