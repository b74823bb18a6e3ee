pub mod hints;
pub mod money;
