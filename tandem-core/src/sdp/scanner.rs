/// Line-oriented view over a session description.
///
/// Accepts both `\r\n` and bare `\n` terminators. Returned lines never
/// include the terminator.
#[derive(Debug, Clone, Copy)]
pub struct SdpScanner<'a> {
    sdp: &'a str,
}

impl<'a> SdpScanner<'a> {
    pub fn new(sdp: &'a str) -> Self {
        Self { sdp }
    }

    pub fn lines(&self) -> impl Iterator<Item = &'a str> + 'a {
        self.sdp
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
    }

    /// First line carrying `marker` (e.g. `a=ice-ufrag`), session or media level.
    pub fn attribute_line(&self, marker: &str) -> Option<&'a str> {
        self.lines().find(|line| has_marker(line, marker))
    }

    /// Whether the description contains an `m=<kind>` section.
    pub fn has_media(&self, kind: &str) -> bool {
        self.lines().any(|line| {
            line.strip_prefix("m=")
                .and_then(|rest| rest.split(' ').next())
                .is_some_and(|media| media == kind)
        })
    }

    pub fn media_count(&self) -> usize {
        self.lines().filter(|line| line.starts_with("m=")).count()
    }
}

pub(crate) fn has_marker(line: &str, marker: &str) -> bool {
    line.strip_prefix(marker)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(':'))
}
