pub mod loading;
pub mod splits;
