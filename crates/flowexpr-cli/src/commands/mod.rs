pub mod params;
pub mod resolve;
