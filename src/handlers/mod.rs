/// Handler modules for Discord gateway events
mod discord;

// Re-export the event handler
pub use discord::BotHandler;
