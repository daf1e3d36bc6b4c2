use crate::sdp::error::SdpError;
use crate::sdp::scanner::{SdpScanner, has_marker};

pub const ICE_UFRAG: &str = "a=ice-ufrag";
pub const ICE_PWD: &str = "a=ice-pwd";
pub const FINGERPRINT: &str = "a=fingerprint";

/// ICE identity and DTLS fingerprint reused by every section of the
/// synthesized answer. Each field holds the complete attribute line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerCredentials {
    ice_ufrag: String,
    ice_pwd: String,
    fingerprint: String,
}

impl AnswerCredentials {
    /// Pull the three attribute lines out of a local description.
    pub fn extract(sdp: &str) -> Result<Self, SdpError> {
        let scanner = SdpScanner::new(sdp);
        let line = |marker: &'static str| -> Result<String, SdpError> {
            let line = scanner
                .attribute_line(marker)
                .ok_or(SdpError::MissingAttribute(marker))?;
            validate(line, marker)?;
            Ok(line.to_owned())
        };

        Ok(Self {
            ice_ufrag: line(ICE_UFRAG)?,
            ice_pwd: line(ICE_PWD)?,
            fingerprint: line(FINGERPRINT)?,
        })
    }

    /// Build from already-known attribute lines, e.g. `a=ice-ufrag:abcd`.
    pub fn new(
        ice_ufrag: impl Into<String>,
        ice_pwd: impl Into<String>,
        fingerprint: impl Into<String>,
    ) -> Result<Self, SdpError> {
        let credentials = Self {
            ice_ufrag: ice_ufrag.into(),
            ice_pwd: ice_pwd.into(),
            fingerprint: fingerprint.into(),
        };
        validate(&credentials.ice_ufrag, ICE_UFRAG)?;
        validate(&credentials.ice_pwd, ICE_PWD)?;
        validate(&credentials.fingerprint, FINGERPRINT)?;
        Ok(credentials)
    }

    pub fn ice_ufrag(&self) -> &str {
        &self.ice_ufrag
    }

    pub fn ice_pwd(&self) -> &str {
        &self.ice_pwd
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Lines in the order they appear in every answer section.
    pub(crate) fn lines(&self) -> [&str; 3] {
        [&self.ice_ufrag, &self.ice_pwd, &self.fingerprint]
    }
}

fn validate(line: &str, marker: &'static str) -> Result<(), SdpError> {
    if !has_marker(line, marker) {
        return Err(SdpError::MissingAttribute(marker));
    }
    if line.contains(['\r', '\n']) {
        return Err(SdpError::MalformedAttribute(marker));
    }

    let value = line[marker.len()..].trim_start_matches(':').trim();
    if value.is_empty() {
        return Err(SdpError::EmptyAttribute(marker));
    }
    Ok(())
}
