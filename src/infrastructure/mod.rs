pub mod canned;
pub mod in_memory;
pub mod openai;
pub mod telegram;
