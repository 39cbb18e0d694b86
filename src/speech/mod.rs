pub mod session;
pub mod speech_model;
