pub mod access_token;
pub mod egress_client;
pub mod room_client;
