pub mod geo;
pub mod orders;
pub mod ranking;
pub mod suggestion;
pub mod wallet;
