pub mod custom_data;
pub mod lifecycle;
