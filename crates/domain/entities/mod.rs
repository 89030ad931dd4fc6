pub mod payment_orders;
pub mod recordings;
pub mod user_profiles;
