pub mod ai_model;
pub mod local_parser;
pub mod parser;
