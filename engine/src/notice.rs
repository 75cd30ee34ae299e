//! Transient status messages shown in the footer.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

pub const NOTICE_TTL: Duration = Duration::from_secs(4);
const MAX_QUEUED: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
    shown_at: Instant,
}

impl Notice {
    #[must_use]
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= NOTICE_TTL
    }
}

#[derive(Debug, Default)]
pub struct Notices {
    queue: VecDeque<Notice>,
}

impl Notices {
    pub fn push(&mut self, level: NoticeLevel, text: impl Into<String>) {
        self.push_at(level, text, Instant::now());
    }

    pub(crate) fn push_at(&mut self, level: NoticeLevel, text: impl Into<String>, now: Instant) {
        let text = text.into();
        // Same message again just refreshes its timer.
        self.queue.retain(|n| !(n.level == level && n.text == text));
        if self.queue.len() == MAX_QUEUED {
            self.queue.pop_front();
        }
        self.queue.push_back(Notice {
            level,
            text,
            shown_at: now,
        });
    }

    /// Newest live notice.
    #[must_use]
    pub fn current(&self) -> Option<&Notice> {
        self.queue.back()
    }

    pub fn prune(&mut self, now: Instant) {
        self.queue.retain(|n| !n.is_expired(now));
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.queue.iter()
    }
}
