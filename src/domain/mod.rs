pub mod card;
pub mod event;
pub mod ports;
pub mod reading;
pub mod token;
