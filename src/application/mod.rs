pub mod events;
pub mod fulfillment;
pub mod invoice;
