pub mod client;

pub use client::{BotCommand, RemoteClient, RemoteError};
