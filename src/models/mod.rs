pub mod campaign;
pub mod email;
pub mod identity;
