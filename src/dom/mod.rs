pub mod control;
pub mod dom_model;
pub mod parser;
pub mod selector;
