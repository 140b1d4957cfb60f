pub mod params;
pub mod report;
