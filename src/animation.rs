pub mod action;
pub mod ease;
pub mod effect;
