//! Validation of the video link typed on the input screen.

use std::fmt;
use std::str::FromStr;

use crate::error::InputError;

const SCHEMES: [&str; 2] = ["https://", "http://"];
const HOSTS: [&str; 2] = ["youtube.com", "youtu.be"];

/// A link that plausibly points at a YouTube video.
///
/// Accepted shape: `[http(s)://][www.](youtube.com|youtu.be)/<path>` where the
/// path is at least one character. Scheme and host are matched without regard
/// to case; the path is kept as typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoUrl(String);

impl VideoUrl {
    pub fn parse(raw: &str) -> Result<Self, InputError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(InputError::Empty);
        }

        if is_youtube_link(trimmed) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(InputError::InvalidUrl {
                input: trimmed.to_string(),
            })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for VideoUrl {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for VideoUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for VideoUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn is_youtube_link(link: &str) -> bool {
    let rest = SCHEMES
        .iter()
        .find_map(|scheme| strip_prefix_ignore_case(link, scheme))
        .unwrap_or(link);
    let rest = strip_prefix_ignore_case(rest, "www.").unwrap_or(rest);

    HOSTS.iter().any(|host| {
        strip_prefix_ignore_case(rest, host)
            .and_then(|after_host| after_host.strip_prefix('/'))
            .is_some_and(|path| !path.is_empty())
    })
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        s.get(prefix.len()..)
    } else {
        None
    }
}
