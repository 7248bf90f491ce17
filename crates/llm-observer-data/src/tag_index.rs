//! Tag-indexed text extraction from markup documents.
//!
//! Benchmark prompts render model answers as HTML. [`index_tagged_text`]
//! flattens the text of every element with a given tag across a batch of
//! documents, keeping the document position (`x_index`) and the element
//! position within that document (`y_index`).

use serde::{Deserialize, Serialize};

/// An element whose text content can be extracted.
pub trait ElementText {
    /// Returns the element's concatenated text content.
    fn text(&self) -> String;
}

/// A document that can be searched for elements by tag name.
pub trait TagSearch {
    /// Element type returned by [`TagSearch::find_all`].
    type Element: ElementText;

    /// Returns every element named `tag`, in document order.
    fn find_all(&self, tag: &str) -> Vec<Self::Element>;
}

/// Text of one tagged element together with its position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedTextEntry {
    /// Position of the source document in the input batch.
    pub x_index: usize,
    /// Position of the element within its document.
    pub y_index: usize,
    /// Extracted text.
    pub text: String,
}

/// Flattens tagged element text across `documents`.
///
/// Documents without matching elements contribute no entries but still
/// consume an `x_index`.
///
/// # Example
///
/// ```
/// use llm_observer_data::{ElementText, TagSearch, index_tagged_text};
///
/// struct Cell(String);
///
/// impl ElementText for Cell {
///     fn text(&self) -> String {
///         self.0.clone()
///     }
/// }
///
/// struct Row(Vec<&'static str>);
///
/// impl TagSearch for Row {
///     type Element = Cell;
///
///     fn find_all(&self, tag: &str) -> Vec<Cell> {
///         if tag == "td" {
///             self.0.iter().map(|text| Cell((*text).to_owned())).collect()
///         } else {
///             Vec::new()
///         }
///     }
/// }
///
/// let entries = index_tagged_text(&[Row(vec!["a", "b"]), Row(vec!["c"])], "td");
///
/// assert_eq!(entries.len(), 3);
/// assert_eq!((entries[2].x_index, entries[2].y_index), (1, 0));
/// ```
#[must_use]
pub fn index_tagged_text<D>(documents: &[D], tag: &str) -> Vec<TaggedTextEntry>
where
    D: TagSearch,
{
    documents
        .iter()
        .enumerate()
        .flat_map(|(x_index, document)| {
            document
                .find_all(tag)
                .into_iter()
                .enumerate()
                .map(move |(y_index, element)| TaggedTextEntry {
                    x_index,
                    y_index,
                    text: element.text(),
                })
        })
        .collect()
}
