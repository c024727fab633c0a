pub mod contrast;
pub mod extract;
pub mod harmony;
pub mod load;
