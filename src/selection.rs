use crate::link::{Link, LinkIdentity};
use std::rc::Rc;

/// Link selection that survives link-list rebuilds.
///
/// Selection is kept as an immutable snapshot of [`LinkIdentity`] values in
/// selection order, replaced wholesale on every mutation. Each mutating call
/// also takes the current link list and leaves `Link::selected` agreeing with
/// the snapshot before it returns.
#[derive(Debug, Clone)]
pub struct SelectionModel {
    selected: Rc<[LinkIdentity]>,
    most_recent: Option<LinkIdentity>,
    allow_multiple: bool,
}

impl Default for SelectionModel {
    fn default() -> Self {
        Self::new(false)
    }
}

impl SelectionModel {
    pub fn new(allow_multiple: bool) -> Self {
        Self {
            selected: Rc::from(Vec::new()),
            most_recent: None,
            allow_multiple,
        }
    }

    pub fn allows_multiple(&self) -> bool {
        self.allow_multiple
    }

    /// Turning multi-select off keeps only the most recent selection.
    pub fn set_allow_multiple(&mut self, allow: bool, links: &mut [Link]) {
        self.allow_multiple = allow;
        if !allow && self.selected.len() > 1 {
            let keep = self.most_recent.clone().or_else(|| self.selected.last().cloned());
            self.replace(keep.clone().into_iter().collect(), keep);
            self.apply_flags(links);
        }
    }

    /// Select `index` alone, or nothing when `None`.
    pub fn select_exclusive(&mut self, links: &mut [Link], index: Option<usize>) {
        let identity = index.and_then(|i| links.get(i)).map(Link::identity);
        self.replace(identity.clone().into_iter().collect(), identity);
        self.apply_flags(links);
    }

    /// Add `index` to the selection, or remove it if already selected.
    ///
    /// Without multi-select this is [`select_exclusive`](Self::select_exclusive).
    pub fn toggle_in_selection(&mut self, links: &mut [Link], index: usize) {
        if !self.allow_multiple {
            self.select_exclusive(links, Some(index));
            return;
        }
        let Some(identity) = links.get(index).map(Link::identity) else {
            return;
        };

        if self.contains(&identity) {
            let remaining = self.selected.iter().filter(|id| **id != identity).cloned().collect();
            self.replace(remaining, None);
        } else {
            let mut extended = self.selected.to_vec();
            extended.push(identity.clone());
            self.replace(extended, Some(identity));
        }
        self.apply_flags(links);
    }

    /// Re-attach the selection to a freshly rebuilt link list.
    ///
    /// Previous selections are matched by identity; the most recent selection
    /// becomes the last one matched. Selections with no counterpart in
    /// `new_links` are dropped.
    pub fn reconcile_after_rebuild(&mut self, new_links: &mut [Link]) {
        let mut matched: Vec<LinkIdentity> = Vec::new();
        let mut most_recent = None;

        for previous in self.selected.iter() {
            let found = new_links
                .iter()
                .map(Link::identity)
                .find(|id| id == previous && !matched.contains(id));
            if let Some(id) = found {
                most_recent = Some(id.clone());
                matched.push(id);
            }
        }

        if matched.len() != self.selected.len() {
            log::debug!(
                "dropped {} selected link(s) missing after rebuild",
                self.selected.len() - matched.len()
            );
        }
        self.replace(matched, most_recent);
        self.apply_flags(new_links);
    }

    /// Replace the selection with `identities`, applied to links at the next
    /// [`reconcile_after_rebuild`](Self::reconcile_after_rebuild).
    pub fn select_objects<I>(&mut self, identities: I)
    where
        I: IntoIterator<Item = LinkIdentity>,
    {
        let mut ids: Vec<LinkIdentity> = Vec::new();
        for id in identities {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        if !self.allow_multiple && ids.len() > 1 {
            ids.drain(..ids.len() - 1);
        }
        let last = ids.last().cloned();
        self.replace(ids, last);
    }

    /// Deselect everything.
    pub fn clear(&mut self, links: &mut [Link]) {
        self.replace(Vec::new(), None);
        self.apply_flags(links);
    }

    /// Forget the most recent selection without changing the set.
    pub fn clear_most_recent(&mut self) {
        self.most_recent = None;
    }

    pub fn contains(&self, identity: &LinkIdentity) -> bool {
        self.selected.contains(identity)
    }

    /// The current snapshot, in selection order.
    pub fn selected(&self) -> Rc<[LinkIdentity]> {
        self.selected.clone()
    }

    pub fn most_recent(&self) -> Option<&LinkIdentity> {
        self.most_recent.as_ref()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    fn replace(&mut self, selected: Vec<LinkIdentity>, most_recent: Option<LinkIdentity>) {
        self.selected = Rc::from(selected);
        self.most_recent = most_recent;
    }

    fn apply_flags(&self, links: &mut [Link]) {
        for link in links.iter_mut() {
            link.selected = self.selected.contains(&link.identity());
        }
    }
}
