use crate::config::Config;

/// Per-session mutable state threaded through the read loop. The prompt
/// lives here rather than in any process-wide global so the `prompt`
/// builtin can rewrite it for subsequent lines.
#[derive(Debug, Clone)]
pub struct Session {
    pub prompt: String,
}

impl Session {
    pub fn new(config: &Config) -> Self {
        Session {
            prompt: config.prompt.clone(),
        }
    }
}
