//! Publishable instances and their collected attachments.

use serde_json::{Map, Value};

/// One publishable unit of work within a collection pass.
///
/// Only `folder_path` and `audio` are interpreted by this crate. Everything
/// other collectors have stashed on the instance lives in `data` and is
/// carried through untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    pub name: String,
    /// Full path of the folder this instance publishes into (opaque,
    /// case-sensitive).
    pub folder_path: String,
    /// Families this instance belongs to; collectors use these to decide
    /// whether the instance concerns them.
    pub families: Vec<String>,
    /// Audio attachments, absent until a collector resolves them. Once set
    /// to a non-empty list it is never overwritten within a run.
    pub audio: Option<Vec<AudioAttachment>>,
    /// Attribute bag owned by unrelated collectors; opaque pass-through.
    pub data: Map<String, Value>,
}

impl Instance {
    pub fn new(name: impl Into<String>, folder_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            folder_path: folder_path.into(),
            families: Vec::new(),
            audio: None,
            data: Map::new(),
        }
    }

    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.families.push(family.into());
        self
    }

    /// Whether audio has already been collected for this instance.
    ///
    /// An empty list counts as "not collected" so a previous partial pass
    /// can be completed.
    pub fn has_audio(&self) -> bool {
        self.audio.as_ref().is_some_and(|audio| !audio.is_empty())
    }

    /// Whether this instance belongs to any of the given families.
    ///
    /// An empty filter matches every instance.
    pub fn in_families(&self, families: &[String]) -> bool {
        families.is_empty() || self.families.iter().any(|family| families.contains(family))
    }
}

/// A single resolved audio file reference attached to an instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioAttachment {
    /// Frame/sample offset at which playback starts.
    pub offset: i64,
    /// Concrete path of the resolved audio representation.
    pub filename: String,
}

impl AudioAttachment {
    pub fn new(filename: impl Into<String>) -> Self {
        Self { offset: 0, filename: filename.into() }
    }

    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn families(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn test_empty_audio_counts_as_uncollected() {
        let mut instance = Instance::new("review_sh010", "seq01/sh010");
        assert!(!instance.has_audio());
        instance.audio = Some(Vec::new());
        assert!(!instance.has_audio());
        instance.audio = Some(vec![AudioAttachment::new("/pub/audio/sh010.wav")]);
        assert!(instance.has_audio());
    }

    #[rstest]
    #[case(&[], true)]
    #[case(&["review"], true)]
    #[case(&["review", "render"], true)]
    #[case(&["render"], false)]
    fn test_family_filter(#[case] filter: &[&str], #[case] expected: bool) {
        let instance = Instance::new("review_sh010", "seq01/sh010").with_family("review");
        assert_eq!(instance.in_families(&families(filter)), expected);
    }

    #[test]
    fn test_attachment_defaults_to_zero_offset() {
        let attachment = AudioAttachment::new("/pub/audio/sh010.wav");
        assert_eq!(attachment.offset, 0);
        assert_eq!(attachment.with_offset(24).offset, 24);
    }
}
