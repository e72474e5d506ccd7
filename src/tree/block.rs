#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::format::ParagraphFormat;
use super::inline::{Inline, Run};
use super::stable_id::StableId;

/// A block-level element. The set of kinds is closed; the whole engine
/// dispatches over this union rather than a trait hierarchy.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Paragraph(Paragraph),
    Table(Table),
    TextBox(TextBox),
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    pub id: Option<StableId>,
    pub format: ParagraphFormat,
    pub inlines: Vec<Inline>,
}

impl Paragraph {
    #[must_use]
    pub fn new(inlines: Vec<Inline>) -> Self {
        Self {
            id: None,
            format: ParagraphFormat::default(),
            inlines,
        }
    }

    #[must_use]
    pub fn with_format(inlines: Vec<Inline>, format: ParagraphFormat) -> Self {
        Self {
            id: None,
            format,
            inlines,
        }
    }

    /// A paragraph holding a single unformatted run.
    #[must_use]
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::new(vec![Inline::Run(Run::plain(text))])
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub id: Option<StableId>,
    pub rows: Vec<Row>,
}

impl Table {
    #[must_use]
    pub fn new(rows: Vec<Row>) -> Self {
        Self { id: None, rows }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: Option<StableId>,
    pub cells: Vec<Cell>,
}

impl Row {
    #[must_use]
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { id: None, cells }
    }

    /// A row of single-paragraph cells, one per text.
    #[must_use]
    pub fn from_texts<T: Into<String>>(texts: impl IntoIterator<Item = T>) -> Self {
        Self::new(
            texts
                .into_iter()
                .map(|text| Cell::new(vec![Block::Paragraph(Paragraph::from_text(text))]))
                .collect(),
        )
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub id: Option<StableId>,
    pub blocks: Vec<Block>,
}

impl Cell {
    #[must_use]
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { id: None, blocks }
    }
}

/// A floating or anchored text frame; compared like any other container.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBox {
    pub id: Option<StableId>,
    pub blocks: Vec<Block>,
}

impl TextBox {
    #[must_use]
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { id: None, blocks }
    }
}
