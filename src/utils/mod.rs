pub mod paths;
pub mod value;
