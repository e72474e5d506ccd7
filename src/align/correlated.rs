/// Classification of one aligned item.
///
/// `Equal`, `Inserted` and `Deleted` come straight out of the aligner.
/// `Unknown` marks a pair the differ considers related (same kind, different
/// hash) and will refine one level further down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CorrelationTag {
    Equal,
    Inserted,
    Deleted,
    Unknown,
}

/// One item of a correlated sequence: a tag plus indices into the original
/// and/or revised input slices. Every input unit of one alignment call
/// appears in exactly one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Correlated {
    pub tag: CorrelationTag,
    pub original: Option<usize>,
    pub revised: Option<usize>,
}

impl Correlated {
    pub(crate) fn equal(original: usize, revised: usize) -> Self {
        Self {
            tag: CorrelationTag::Equal,
            original: Some(original),
            revised: Some(revised),
        }
    }

    pub(crate) fn deleted(original: usize) -> Self {
        Self {
            tag: CorrelationTag::Deleted,
            original: Some(original),
            revised: None,
        }
    }

    pub(crate) fn inserted(revised: usize) -> Self {
        Self {
            tag: CorrelationTag::Inserted,
            original: None,
            revised: Some(revised),
        }
    }

    pub(crate) fn unknown(original: usize, revised: usize) -> Self {
        Self {
            tag: CorrelationTag::Unknown,
            original: Some(original),
            revised: Some(revised),
        }
    }
}
