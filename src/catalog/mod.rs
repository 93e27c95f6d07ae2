pub mod classes;
pub mod source;
pub mod spells;
