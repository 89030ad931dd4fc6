pub mod egress;
pub mod egress_webhook;
pub mod enums;
pub mod rooms;
pub mod storage;
