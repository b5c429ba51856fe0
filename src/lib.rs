pub mod build;
pub mod engine;
pub mod grid;
pub mod normalize;
pub mod parse;
