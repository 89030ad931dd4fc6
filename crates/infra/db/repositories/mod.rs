pub mod credits;
pub mod payment_orders;
pub mod recordings;
