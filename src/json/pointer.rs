use std::fmt;

/// Slash-separated path addressing a subtree of a JSON document.
///
/// The empty pointer addresses the document root. Segments are plain field
/// names; array indices are not addressable because projections are
/// object-shaped at every level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pointer {
    segments: Vec<String>,
}

impl Pointer {
    /// Returns the pointer addressing the document root.
    pub fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Parses a pointer from its textual form.
    ///
    /// Leading and trailing slashes are tolerated; `""` and `"/"` both
    /// address the root.
    pub fn parse(input: &str) -> Self {
        let segments = input
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| segment.to_string())
            .collect();
        Self { segments }
    }

    /// Builds a pointer from pre-split segments.
    pub fn from_segments(segments: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// True when the pointer addresses the document root.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// The path segments, outermost first.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.segments {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

impl From<&str> for Pointer {
    fn from(input: &str) -> Self {
        Self::parse(input)
    }
}
