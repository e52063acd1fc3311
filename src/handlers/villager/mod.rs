pub mod create;
pub mod delete;
pub mod get;
pub mod helper;
pub mod update;
