pub mod hardware;
pub mod price;
pub mod storage;
pub mod tier;
