pub mod lifecycle;
pub mod record;
pub mod stack;
