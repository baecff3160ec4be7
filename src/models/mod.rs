pub mod account;
pub mod chat;
pub mod chat_index;
pub mod message;

pub use account::Account;
pub use chat::Chat;
pub use chat_index::ChatSummary;
pub use message::Message;
