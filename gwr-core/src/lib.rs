pub mod reading;
pub mod season;
pub mod station;
pub mod window;
