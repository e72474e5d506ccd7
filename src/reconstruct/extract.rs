//! Derives the flat revision list from the reconstructed tree and checks
//! the output invariants.

use std::collections::{BTreeMap, HashSet};

use crate::errors::CompareError;
use crate::revision::{FormatChange, MoveGroupId, Revision, RevisionId, RevisionKind};

use super::revised::{
    ParagraphMarkRevision, RevisedBlock, RevisedDocument, RevisedInline, RevisedParagraph,
    RevisionMark, RunRevision,
};

/// Walks the reconstructed tree in document order and produces one
/// [`Revision`] record per contiguous revised span: adjacent records of the
/// same kind and move pairing merge, so a deleted row or a moved paragraph
/// surfaces as a single entry.
pub(crate) fn extract_revisions(document: &RevisedDocument) -> Vec<Revision> {
    let mut revisions = Vec::new();
    for paragraph in all_paragraphs(document) {
        for inline in &paragraph.inlines {
            match inline {
                RevisedInline::Run(run) => {
                    if let Some(revision) = &run.revision {
                        revisions.push(run_record(
                            revision,
                            &run.text,
                            run.format.property_set(),
                        ));
                    }
                }
                RevisedInline::Object(object) => {
                    if let Some(revision) = &object.revision {
                        revisions.push(run_record(revision, "", object.format.property_set()));
                    }
                }
                RevisedInline::MoveRangeStart(_) | RevisedInline::MoveRangeEnd(_) => {}
            }
        }
        if let Some(revision) = &paragraph.mark_revision {
            revisions.push(mark_record(revision, &paragraph.format.property_set()));
        }
    }
    merge_adjacent(revisions)
}

/// Revision-id invariants over one reconstructed document: every markup
/// element's id is unique, except that the start and end bracket of one move
/// range share theirs. A violation is an implementation bug, never bad
/// input.
pub(crate) fn verify_revision_ids(document: &RevisedDocument) -> Result<(), CompareError> {
    let mut seen: HashSet<RevisionId> = HashSet::new();
    let mut brackets: BTreeMap<RevisionId, Vec<(MoveGroupId, bool)>> = BTreeMap::new();

    for paragraph in all_paragraphs(document) {
        for inline in &paragraph.inlines {
            match inline {
                RevisedInline::Run(run) => {
                    if let Some(revision) = &run.revision {
                        claim(revision.mark().id, &mut seen)?;
                    }
                }
                RevisedInline::Object(object) => {
                    if let Some(revision) = &object.revision {
                        claim(revision.mark().id, &mut seen)?;
                    }
                }
                RevisedInline::MoveRangeStart(range) => {
                    brackets
                        .entry(range.id)
                        .or_default()
                        .push((range.group, true));
                }
                RevisedInline::MoveRangeEnd(range) => {
                    brackets
                        .entry(range.id)
                        .or_default()
                        .push((range.group, false));
                }
            }
        }
        if let Some(revision) = &paragraph.mark_revision {
            claim(revision.mark().id, &mut seen)?;
        }
    }

    for (id, ends) in brackets {
        let paired = matches!(
            ends.as_slice(),
            [(first_group, first_is_start), (second_group, second_is_start)]
                if first_group == second_group && first_is_start != second_is_start
        );
        if !paired {
            let group = ends.first().map_or(MoveGroupId(0), |(group, _)| *group);
            return Err(CompareError::UnpairedMoveRange { id, group });
        }
        claim(id, &mut seen)?;
    }

    Ok(())
}

fn claim(id: RevisionId, seen: &mut HashSet<RevisionId>) -> Result<(), CompareError> {
    if seen.insert(id) {
        Ok(())
    } else {
        Err(CompareError::DuplicateRevisionId { id })
    }
}

fn all_paragraphs(document: &RevisedDocument) -> Vec<&RevisedParagraph> {
    let mut paragraphs = Vec::new();
    collect_blocks(&document.body, &mut paragraphs);
    for part in &document.headers {
        collect_blocks(&part.blocks, &mut paragraphs);
    }
    for part in &document.footers {
        collect_blocks(&part.blocks, &mut paragraphs);
    }
    for note in &document.footnotes {
        collect_blocks(&note.blocks, &mut paragraphs);
    }
    for note in &document.endnotes {
        collect_blocks(&note.blocks, &mut paragraphs);
    }
    paragraphs
}

fn collect_blocks<'d>(blocks: &'d [RevisedBlock], out: &mut Vec<&'d RevisedParagraph>) {
    for block in blocks {
        match block {
            RevisedBlock::Paragraph(paragraph) => out.push(paragraph),
            RevisedBlock::Table(table) => {
                for row in &table.rows {
                    for cell in &row.cells {
                        collect_blocks(&cell.blocks, out);
                    }
                }
            }
            RevisedBlock::TextBox(text_box) => collect_blocks(&text_box.blocks, out),
        }
    }
}

fn run_record(
    revision: &RunRevision,
    text: &str,
    new_properties: std::collections::BTreeMap<String, String>,
) -> Revision {
    match revision {
        RunRevision::Inserted(mark) => record(mark, RevisionKind::Inserted, text, None, None, None),
        RunRevision::Deleted(mark) => record(mark, RevisionKind::Deleted, text, None, None, None),
        RunRevision::MovedFrom { mark, group } => record(
            mark,
            RevisionKind::Moved,
            text,
            Some(*group),
            Some(true),
            None,
        ),
        RunRevision::MovedTo { mark, group } => record(
            mark,
            RevisionKind::Moved,
            text,
            Some(*group),
            Some(false),
            None,
        ),
        RunRevision::FormatChanged {
            mark,
            old,
            changed_property_names,
        } => record(
            mark,
            RevisionKind::FormatChanged,
            text,
            None,
            None,
            Some(FormatChange {
                old_properties: old.property_set(),
                new_properties,
                changed_property_names: changed_property_names.clone(),
            }),
        ),
    }
}

fn mark_record(
    revision: &ParagraphMarkRevision,
    new_properties: &std::collections::BTreeMap<String, String>,
) -> Revision {
    match revision {
        ParagraphMarkRevision::Inserted(mark) => {
            record(mark, RevisionKind::Inserted, "", None, None, None)
        }
        ParagraphMarkRevision::Deleted(mark) => {
            record(mark, RevisionKind::Deleted, "", None, None, None)
        }
        ParagraphMarkRevision::MovedFrom { mark, group } => record(
            mark,
            RevisionKind::Moved,
            "",
            Some(*group),
            Some(true),
            None,
        ),
        ParagraphMarkRevision::MovedTo { mark, group } => record(
            mark,
            RevisionKind::Moved,
            "",
            Some(*group),
            Some(false),
            None,
        ),
        ParagraphMarkRevision::FormatChanged {
            mark,
            old,
            changed_property_names,
        } => record(
            mark,
            RevisionKind::FormatChanged,
            "",
            None,
            None,
            Some(FormatChange {
                old_properties: old.property_set(),
                new_properties: new_properties.clone(),
                changed_property_names: changed_property_names.clone(),
            }),
        ),
    }
}

fn record(
    mark: &RevisionMark,
    kind: RevisionKind,
    text: &str,
    move_group: Option<MoveGroupId>,
    is_move_source: Option<bool>,
    format_change: Option<FormatChange>,
) -> Revision {
    Revision {
        author: mark.author.clone(),
        date: mark.date,
        kind,
        text: text.to_owned(),
        move_group,
        is_move_source,
        format_change,
    }
}

fn merge_adjacent(revisions: Vec<Revision>) -> Vec<Revision> {
    let mut merged: Vec<Revision> = Vec::new();
    for revision in revisions {
        if let Some(last) = merged.last_mut()
            && last.kind == revision.kind
            && last.kind != RevisionKind::FormatChanged
            && last.move_group == revision.move_group
            && last.is_move_source == revision.is_move_source
        {
            last.text.push_str(&revision.text);
            continue;
        }
        merged.push(revision);
    }
    merged
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    use crate::revision::RevisionId;
    use crate::tree::{ParagraphFormat, RunFormat, StableId};

    use super::super::revised::{MoveRange, RevisedRun};
    use super::*;

    fn mark(id: u64) -> RevisionMark {
        RevisionMark {
            id: RevisionId(id),
            author: "tester".to_owned(),
            date: Utc::now(),
        }
    }

    fn paragraph_of(inlines: Vec<RevisedInline>) -> RevisedParagraph {
        RevisedParagraph {
            stable_id: StableId(1),
            format: ParagraphFormat::default(),
            mark_revision: None,
            inlines,
        }
    }

    fn deleted_run(id: u64, text: &str) -> RevisedInline {
        RevisedInline::Run(RevisedRun {
            text: text.to_owned(),
            format: RunFormat::default(),
            revision: Some(RunRevision::Deleted(mark(id))),
        })
    }

    fn document_of(paragraphs: Vec<RevisedParagraph>) -> RevisedDocument {
        RevisedDocument {
            body: paragraphs.into_iter().map(RevisedBlock::Paragraph).collect(),
            ..RevisedDocument::default()
        }
    }

    #[test]
    fn test_adjacent_same_kind_revisions_merge() {
        let document = document_of(vec![paragraph_of(vec![
            deleted_run(1, "first "),
            deleted_run(2, "second"),
        ])]);
        let revisions = extract_revisions(&document);
        assert_eq!(revisions.len(), 1);
        assert_eq!(revisions[0].text, "first second");
        assert_eq!(revisions[0].kind, RevisionKind::Deleted);
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let document = document_of(vec![paragraph_of(vec![
            deleted_run(1, "a"),
            deleted_run(1, "b"),
        ])]);
        assert_eq!(
            verify_revision_ids(&document),
            Err(CompareError::DuplicateRevisionId {
                id: RevisionId(1)
            })
        );
    }

    #[test]
    fn test_paired_brackets_share_an_id() {
        let range = MoveRange {
            id: RevisionId(7),
            group: MoveGroupId(1),
            is_source: true,
        };
        let document = document_of(vec![paragraph_of(vec![
            RevisedInline::MoveRangeStart(range),
            deleted_run(1, "moved"),
            RevisedInline::MoveRangeEnd(range),
        ])]);
        assert_eq!(verify_revision_ids(&document), Ok(()));
    }

    #[test]
    fn test_unpaired_bracket_is_rejected() {
        let range = MoveRange {
            id: RevisionId(7),
            group: MoveGroupId(1),
            is_source: true,
        };
        let document = document_of(vec![paragraph_of(vec![RevisedInline::MoveRangeStart(
            range,
        )])]);
        assert_eq!(
            verify_revision_ids(&document),
            Err(CompareError::UnpairedMoveRange {
                id: RevisionId(7),
                group: MoveGroupId(1),
            })
        );
    }
}
