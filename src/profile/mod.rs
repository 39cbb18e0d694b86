pub mod blocks;
pub mod builtin;
pub mod composite;
pub mod engine;
pub mod profile_model;
