pub mod export;
pub mod portfolios;
pub mod submissions;
pub mod uploads;
