pub mod percent;
pub mod price;
