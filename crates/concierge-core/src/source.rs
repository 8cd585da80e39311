//! Source citations attached to assistant answers

/// A citation is either a link (shown by host) or plain text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Link { url: String, host: String },
    Plain(String),
}

impl Source {
    /// Classify a raw citation.
    ///
    /// `http://` and `https://` citations are links. A scheme-less citation
    /// whose first path segment is a dotted host name followed by a path
    /// (`ifab.com/laws`) is also a link, opened over https. Anything else is
    /// plain text, e.g. `handbook.pdf` or `docs/assignments.md`.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if let Some(rest) = raw
            .strip_prefix("https://")
            .or_else(|| raw.strip_prefix("http://"))
        {
            return Source::Link {
                url: raw.to_string(),
                host: host_of(rest).to_string(),
            };
        }

        if looks_like_host_path(raw) {
            return Source::Link {
                url: format!("https://{raw}"),
                host: host_of(raw).to_string(),
            };
        }

        Source::Plain(raw.to_string())
    }

    /// Text shown in the citation list
    pub fn display_text(&self) -> &str {
        match self {
            Source::Link { host, .. } => host,
            Source::Plain(text) => text,
        }
    }

    pub fn is_link(&self) -> bool {
        matches!(self, Source::Link { .. })
    }
}

pub fn parse_all(sources: &[String]) -> Vec<Source> {
    sources.iter().map(|s| Source::parse(s)).collect()
}

fn host_of(rest: &str) -> &str {
    rest.split('/').next().unwrap_or_default()
}

fn looks_like_host_path(raw: &str) -> bool {
    let Some((host, _path)) = raw.split_once('/') else {
        return false;
    };
    if raw.chars().any(char::is_whitespace) || host.starts_with('.') || host.ends_with('.') {
        return false;
    }
    let mut labels = host.split('.');
    let first = labels.next().unwrap_or_default();
    let tld = host.rsplit('.').next().unwrap_or_default();
    host.contains('.')
        && !first.is_empty()
        && tld.len() >= 2
        && tld.chars().all(|c| c.is_ascii_alphabetic())
        && host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
}
