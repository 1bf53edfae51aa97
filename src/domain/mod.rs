pub mod events;
pub mod notification;
pub mod payment;
pub mod ports;
