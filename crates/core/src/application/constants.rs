// Submission constants (no magic values)
use std::time::Duration;

/// Default yarGen server base URL
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8080";

/// Delay between job status queries (3s)
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Give up polling after this long (10 minutes)
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(600);
