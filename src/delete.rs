//! Deleting the selected links.
//!
//! Links are owned by their nodes' descriptors, so deletion is a request to the
//! start node. Each selected link produces one [`DeleteOutcome`].

use crate::link::Link;
use crate::node::{NodeId, NodeIndex};
use crate::selection::SelectionModel;
use std::fmt;

/// Why a selected link was left alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The canvas is read-only
    NotEditable,
    /// The link was declared read-only
    NotDeletable,
    /// An endpoint node is not part of the current content
    UnresolvedEndpoint(NodeId),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotEditable => write!(f, "Canvas is not editable"),
            Self::NotDeletable => write!(f, "Link cannot be deleted"),
            Self::UnresolvedEndpoint(id) => write!(f, "Endpoint node {} not found", id),
        }
    }
}

/// Result of trying to delete one selected link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Skipped(SkipReason),
}

impl DeleteOutcome {
    pub fn is_deleted(&self) -> bool {
        matches!(self, DeleteOutcome::Deleted)
    }
}

impl fmt::Display for DeleteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deleted => write!(f, "Deleted"),
            Self::Skipped(reason) => write!(f, "Skipped: {}", reason),
        }
    }
}

fn check_deletable(link: &Link, node_index: &NodeIndex, editable: bool) -> Result<(), SkipReason> {
    if !editable {
        return Err(SkipReason::NotEditable);
    }
    if !link.can_delete {
        return Err(SkipReason::NotDeletable);
    }
    for id in [link.start_node.id(), link.end_node.id()] {
        if !node_index.contains_key(&id) {
            return Err(SkipReason::UnresolvedEndpoint(id));
        }
    }
    Ok(())
}

/// Ask the start node of every selected link to delete it, in selection order.
///
/// The end node is never asked, so each link is deleted exactly once. The
/// selection is cleared afterwards whatever the outcomes.
pub fn delete_links(
    links: &mut [Link],
    selection: &mut SelectionModel,
    node_index: &NodeIndex,
    editable: bool,
) -> Vec<DeleteOutcome> {
    let snapshot = selection.selected();
    let mut outcomes = Vec::with_capacity(snapshot.len());

    for identity in snapshot.iter() {
        let Some(link) = links.iter().find(|link| link.identity() == *identity) else {
            continue;
        };
        let outcome = match check_deletable(link, node_index, editable) {
            Ok(()) => {
                link.start_node.delete_link(link);
                DeleteOutcome::Deleted
            }
            Err(reason) => DeleteOutcome::Skipped(reason),
        };
        log::debug!("delete {}: {}", identity, outcome);
        outcomes.push(outcome);
    }

    selection.clear(links);
    outcomes
}
