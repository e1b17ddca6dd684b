pub mod backend;
pub mod blend;
pub mod damage;
pub mod paint;
pub mod software;
