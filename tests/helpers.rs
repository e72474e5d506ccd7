//! Shared walkers over the reconstructed tree for the integration tests.

use std::collections::HashMap;

use redmark::{
    RevisedBlock, RevisedDocument, RevisedInline, RevisedParagraph, RevisedRun, Revision,
    RevisionId, RevisionKind, RunRevision,
};

/// Every paragraph of the document in document order, auxiliary parts
/// included.
pub fn paragraphs_of(document: &RevisedDocument) -> Vec<&RevisedParagraph> {
    let mut paragraphs = Vec::new();
    collect_paragraphs(&document.body, &mut paragraphs);
    for part in &document.headers {
        collect_paragraphs(&part.blocks, &mut paragraphs);
    }
    for part in &document.footers {
        collect_paragraphs(&part.blocks, &mut paragraphs);
    }
    for note in &document.footnotes {
        collect_paragraphs(&note.blocks, &mut paragraphs);
    }
    for note in &document.endnotes {
        collect_paragraphs(&note.blocks, &mut paragraphs);
    }
    paragraphs
}

fn collect_paragraphs<'d>(blocks: &'d [RevisedBlock], out: &mut Vec<&'d RevisedParagraph>) {
    for block in blocks {
        match block {
            RevisedBlock::Paragraph(paragraph) => out.push(paragraph),
            RevisedBlock::Table(table) => {
                for row in &table.rows {
                    for cell in &row.cells {
                        collect_paragraphs(&cell.blocks, out);
                    }
                }
            }
            RevisedBlock::TextBox(text_box) => collect_paragraphs(&text_box.blocks, out),
        }
    }
}

pub fn all_runs(document: &RevisedDocument) -> Vec<&RevisedRun> {
    paragraphs_of(document)
        .into_iter()
        .flat_map(|paragraph| {
            paragraph.inlines.iter().filter_map(|inline| match inline {
                RevisedInline::Run(run) => Some(run),
                _ => None,
            })
        })
        .collect()
}

/// Texts of the top-level body paragraphs, trailing whitespace trimmed.
pub fn body_paragraph_texts(document: &RevisedDocument) -> Vec<String> {
    document
        .body
        .iter()
        .filter_map(RevisedBlock::as_paragraph)
        .map(|paragraph| paragraph.text().trim_end().to_owned())
        .collect()
}

/// Concatenated text of every run belonging to the original document: runs
/// kept unchanged, deleted, format-changed or marked as a move source.
pub fn deleted_side_text(document: &RevisedDocument) -> String {
    side_text(document, |revision| {
        !matches!(
            revision,
            Some(RunRevision::Inserted(_)) | Some(RunRevision::MovedTo { .. })
        )
    })
}

/// Concatenated text of every run belonging to the revised document: runs
/// kept unchanged, inserted, format-changed or marked as a move destination.
pub fn inserted_side_text(document: &RevisedDocument) -> String {
    side_text(document, |revision| {
        !matches!(
            revision,
            Some(RunRevision::Deleted(_)) | Some(RunRevision::MovedFrom { .. })
        )
    })
}

fn side_text(
    document: &RevisedDocument,
    keep: impl Fn(&Option<RunRevision>) -> bool,
) -> String {
    all_runs(document)
        .into_iter()
        .filter(|run| keep(&run.revision))
        .map(|run| run.text.as_str())
        .collect()
}

pub fn revision_kinds(revisions: &[Revision]) -> HashMap<RevisionKind, usize> {
    let mut kinds = HashMap::new();
    for revision in revisions {
        *kinds.entry(revision.kind).or_insert(0) += 1;
    }
    kinds
}

/// Ids of every run, object and paragraph-mark revision; move-range
/// brackets excluded.
pub fn mark_ids(document: &RevisedDocument) -> Vec<RevisionId> {
    let mut ids = Vec::new();
    for paragraph in paragraphs_of(document) {
        for inline in &paragraph.inlines {
            match inline {
                RevisedInline::Run(run) => {
                    if let Some(revision) = &run.revision {
                        ids.push(revision.mark().id);
                    }
                }
                RevisedInline::Object(object) => {
                    if let Some(revision) = &object.revision {
                        ids.push(revision.mark().id);
                    }
                }
                _ => {}
            }
        }
        if let Some(revision) = &paragraph.mark_revision {
            ids.push(revision.mark().id);
        }
    }
    ids
}
