mod account;
mod chat;

pub use account::*;
pub use chat::*;
