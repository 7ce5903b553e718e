//! Short-lived messages shown in the notification bar.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

const NOTICE_TTL: Duration = Duration::from_secs(5);
const MAX_NOTICES: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    posted_at: Instant,
}

/// Most recent notices, newest last.
#[derive(Debug, Default)]
pub struct Notices {
    items: VecDeque<Notice>,
}

impl Notices {
    pub fn push(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.items.push_back(Notice {
            level,
            message: message.into(),
            posted_at: Instant::now(),
        });
        while self.items.len() > MAX_NOTICES {
            self.items.pop_front();
        }
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(NoticeLevel::Info, message);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(NoticeLevel::Success, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(NoticeLevel::Error, message);
    }

    /// Drops notices older than their display time.
    pub fn expire(&mut self, now: Instant) {
        self.items
            .retain(|n| now.saturating_duration_since(n.posted_at) < NOTICE_TTL);
    }

    pub fn latest(&self) -> Option<&Notice> {
        self.items.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.items.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_newest_notices() {
        let mut notices = Notices::default();
        for i in 0..6 {
            notices.info(format!("notice {i}"));
        }
        assert_eq!(notices.iter().count(), MAX_NOTICES);
        assert_eq!(notices.latest().unwrap().message, "notice 5");
    }

    #[test]
    fn test_expire() {
        let mut notices = Notices::default();
        notices.error("Failed to generate quiz");
        notices.expire(Instant::now());
        assert!(!notices.is_empty());

        notices.expire(Instant::now() + NOTICE_TTL);
        assert!(notices.is_empty());
    }
}
