/// Default minutes before a class end at which the notification fires
pub const DEFAULT_LEAD_MINUTES: u32 = 20;

/// Default text appended to every class notification
pub const DEFAULT_NOTIFY_MESSAGE: &str = "Please do proxy";

/// Default HTTP listen port for the control surface
pub const DEFAULT_PORT: u16 = 3000;

/// Text sent by the startup self-test and the test endpoint
pub const TEST_MESSAGE: &str = "This is a test message from the class notification bot. \
If you receive this, the bot is working correctly!";

/// Log directive for the application
pub const LOG_DIRECTIVE: &str = "proxybot_rs=info";
