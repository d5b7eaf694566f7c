//! Database layer

pub mod questdb;

pub use questdb::QuestDatabase;
