pub mod apply;
pub mod dispatch;
pub mod fill_model;
pub mod generic;
pub mod matcher;
