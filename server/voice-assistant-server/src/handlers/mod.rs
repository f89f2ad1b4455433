pub mod conversation;
pub mod health;
