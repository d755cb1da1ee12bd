pub mod arena;
pub mod directory;
pub mod entry;
pub mod error;
pub mod key;
pub mod message;
pub mod receiver;
pub mod session;
pub mod transmitter;
