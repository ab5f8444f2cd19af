pub mod cache;
pub mod catalog;
pub mod chart;
pub mod config;
pub mod observation;
pub mod output;
pub mod parser;
pub mod plot;
pub mod projection;
pub mod range;
pub mod record;
pub mod series;
pub mod window;
