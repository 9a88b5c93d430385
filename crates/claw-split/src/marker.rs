//! Boundary markers.
//!
//! The aggregated stream separates containers with header lines in the
//! style of `tail` (`==> <path> <==`). The container name is a fixed
//! `/`-separated segment of that header.

use crate::error::{Result, SplitError};

/// Prefix that identifies a boundary marker line.
pub const DEFAULT_MARKER_TOKEN: &str = "==>";

/// Index of the `/`-separated segment holding the container name.
pub const DEFAULT_NAME_SEGMENT: usize = 5;

/// Recognises boundary markers and extracts container names from them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerParser {
    token: String,
    segment: usize,
}

impl Default for MarkerParser {
    fn default() -> Self {
        Self::new(DEFAULT_MARKER_TOKEN, DEFAULT_NAME_SEGMENT)
    }
}

impl MarkerParser {
    /// Creates a parser for the given token and name segment index.
    #[must_use]
    pub fn new(token: impl Into<String>, segment: usize) -> Self {
        Self {
            token: token.into(),
            segment,
        }
    }

    /// Returns true if `line` starts a new container section.
    #[must_use]
    pub fn is_marker(&self, line: &[u8]) -> bool {
        line.starts_with(self.token.as_bytes())
    }

    /// Extracts the container name from a marker line.
    ///
    /// The token is stripped, the remainder split on `/`, and the configured
    /// segment returned verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::MalformedMarker`] if the line has too few
    /// segments or the selected segment is empty.
    pub fn container_name(&self, line: &[u8], line_no: u64) -> Result<String> {
        let rest = line.strip_prefix(self.token.as_bytes()).unwrap_or(line);
        let rest = String::from_utf8_lossy(rest);

        let segments: Vec<&str> = rest.split('/').collect();
        let Some(name) = segments.get(self.segment) else {
            return Err(SplitError::MalformedMarker {
                line: line_no,
                reason: format!(
                    "expected at least {} '/'-separated segments, found {}",
                    self.segment + 1,
                    segments.len()
                ),
            });
        };

        if name.is_empty() {
            return Err(SplitError::MalformedMarker {
                line: line_no,
                reason: format!("segment {} is empty", self.segment),
            });
        }

        Ok((*name).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(b"==> a/b/c/d/e/pod1/0.log <==", true ; "marker")]
    #[test_case(b"==>", true ; "bare token")]
    #[test_case(b"{\"log\":\"==> not a marker\"}", false ; "token inside payload")]
    #[test_case(b" ==> a/b", false ; "leading space")]
    #[test_case(b"", false ; "empty line")]
    fn detects_marker(line: &[u8], expected: bool) {
        assert_eq!(MarkerParser::default().is_marker(line), expected);
    }

    #[test]
    fn extracts_sixth_segment() {
        let parser = MarkerParser::default();
        let name = parser
            .container_name(b"==> a/b/c/d/e/pod1/0.log <==", 1)
            .unwrap();
        assert_eq!(name, "pod1");
    }

    #[test]
    fn extracts_kubelet_pod_path() {
        let parser = MarkerParser::default();
        let line = b"==> /var/log/pods/openshift-etcd_etcd-master-0_1234/etcd-member/0.log <==";
        assert_eq!(parser.container_name(line, 1).unwrap(), "etcd-member");
    }

    #[test]
    fn last_segment_taken_verbatim() {
        let parser = MarkerParser::default();
        let name = parser.container_name(b"==> a/b/c/d/e/pod1 <==", 1).unwrap();
        assert_eq!(name, "pod1 <==");
    }

    #[test]
    fn too_few_segments_is_error() {
        let parser = MarkerParser::default();
        let err = parser.container_name(b"==> a/b/c", 4).unwrap_err();
        match err {
            SplitError::MalformedMarker { line, reason } => {
                assert_eq!(line, 4);
                assert!(reason.contains("found 3"), "{reason}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_segment_is_error() {
        let parser = MarkerParser::default();
        let err = parser.container_name(b"==> a/b/c/d/e//0.log", 2).unwrap_err();
        assert!(matches!(err, SplitError::MalformedMarker { line: 2, .. }));
    }

    #[test]
    fn custom_token_and_segment() {
        let parser = MarkerParser::new("###", 1);
        assert!(parser.is_marker(b"### pods/web"));
        assert!(!parser.is_marker(b"==> pods/web"));
        assert_eq!(parser.container_name(b"### pods/web", 1).unwrap(), "web");
    }
}
