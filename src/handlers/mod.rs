pub mod quote_calculate;
pub mod quote_export;
pub mod quote_render;
