pub mod account;
pub mod chat;
