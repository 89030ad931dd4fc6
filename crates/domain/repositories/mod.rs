pub mod credits;
pub mod egress;
pub mod payment_orders;
pub mod realtime;
pub mod recordings;
pub mod rooms;
pub mod storage;
