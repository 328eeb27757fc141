mod client;
pub mod ree;
pub mod source;
