pub mod payload;
pub mod timer;
pub mod tokenizer;
