pub mod assembler;
pub mod exercises;
pub mod response;
