use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Character-level formatting carried by a run.
///
/// Only the attributes that word processors commonly track revisions for are
/// modelled; everything else the adapter wants compared can be folded into
/// `font` or `color` strings.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RunFormat {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strike: bool,
    pub font: Option<String>,
    /// Font size in half-points, as word processors store it.
    pub size: Option<u32>,
    pub color: Option<String>,
    pub highlight: Option<String>,
}

impl RunFormat {
    /// The set properties as a name-value map, used for `FormatChanged`
    /// revisions. Unset properties are absent from the map.
    #[must_use]
    pub fn property_set(&self) -> BTreeMap<String, String> {
        let mut properties = BTreeMap::new();
        for (name, set) in [
            ("bold", self.bold),
            ("italic", self.italic),
            ("underline", self.underline),
            ("strike", self.strike),
        ] {
            if set {
                properties.insert(name.to_owned(), "true".to_owned());
            }
        }
        for (name, value) in [
            ("font", &self.font),
            ("color", &self.color),
            ("highlight", &self.highlight),
        ] {
            if let Some(value) = value {
                properties.insert(name.to_owned(), value.clone());
            }
        }
        if let Some(size) = self.size {
            properties.insert("size".to_owned(), size.to_string());
        }
        properties
    }

    /// Names of the properties whose values differ between `self` and
    /// `other`, in lexicographic order.
    #[must_use]
    pub fn changed_property_names(&self, other: &Self) -> Vec<String> {
        changed_names(&self.property_set(), &other.property_set())
    }

    /// Stable byte signature for hashing.
    pub(crate) fn signature(&self) -> String {
        self.property_set()
            .iter()
            .map(|(name, value)| format!("{name}={value};"))
            .collect()
    }
}

/// Paragraph justification.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    fn as_str(self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Justify => "justify",
        }
    }
}

/// Paragraph-level formatting.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ParagraphFormat {
    pub style: Option<String>,
    pub alignment: Alignment,
    /// Left indentation in twentieths of a point.
    pub indent: Option<i32>,
}

impl ParagraphFormat {
    /// The set properties as a name-value map, used for `FormatChanged`
    /// revisions. Left alignment is the default and is absent from the map.
    #[must_use]
    pub fn property_set(&self) -> BTreeMap<String, String> {
        let mut properties = BTreeMap::new();
        if let Some(style) = &self.style {
            properties.insert("style".to_owned(), style.clone());
        }
        if self.alignment != Alignment::Left {
            properties.insert("alignment".to_owned(), self.alignment.as_str().to_owned());
        }
        if let Some(indent) = self.indent {
            properties.insert("indent".to_owned(), indent.to_string());
        }
        properties
    }

    /// Names of the properties whose values differ between `self` and
    /// `other`, in lexicographic order.
    #[must_use]
    pub fn changed_property_names(&self, other: &Self) -> Vec<String> {
        changed_names(&self.property_set(), &other.property_set())
    }

    pub(crate) fn signature(&self) -> String {
        self.property_set()
            .iter()
            .map(|(name, value)| format!("{name}={value};"))
            .collect()
    }
}

fn changed_names(old: &BTreeMap<String, String>, new: &BTreeMap<String, String>) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for name in old.keys().chain(new.keys()) {
        if old.get(name) != new.get(name) && !names.contains(name) {
            names.push(name.clone());
        }
    }
    names.sort();
    names
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_changed_property_names() {
        let plain = RunFormat::default();
        let bold = RunFormat {
            bold: true,
            ..RunFormat::default()
        };
        assert_eq!(plain.changed_property_names(&bold), vec!["bold"]);
        assert_eq!(bold.changed_property_names(&plain), vec!["bold"]);
        assert_eq!(plain.changed_property_names(&plain), Vec::<String>::new());
    }

    #[test]
    fn test_changed_property_names_value_change() {
        let red = RunFormat {
            color: Some("red".to_owned()),
            ..RunFormat::default()
        };
        let blue = RunFormat {
            color: Some("blue".to_owned()),
            ..RunFormat::default()
        };
        assert_eq!(red.changed_property_names(&blue), vec!["color"]);
    }

    #[test]
    fn test_signature_is_order_stable() {
        let format = RunFormat {
            bold: true,
            italic: true,
            font: Some("Arial".to_owned()),
            ..RunFormat::default()
        };
        assert_eq!(format.signature(), "bold=true;font=Arial;italic=true;");
    }

    #[test]
    fn test_paragraph_default_is_empty() {
        assert!(ParagraphFormat::default().property_set().is_empty());
    }
}
