//! Builds the link list from the current nodes.

use crate::link::{Link, LinkDescriptor, LinkIdentity};
use crate::node::{NodeId, NodeRef};
use std::collections::{HashMap, HashSet};

/// Gather every node's link descriptors in node order.
pub fn gather_descriptors<'a, I>(nodes: I) -> Vec<LinkDescriptor>
where
    I: IntoIterator<Item = &'a NodeRef>,
{
    let mut descriptors = Vec::new();
    for node in nodes {
        if let Some(key) = node.links_key() {
            descriptors.extend(node.links(key.as_str()));
        }
    }
    descriptors
}

/// Derive the deduplicated link list for `nodes`.
///
/// Endpoint ids are looked up among `nodes` (the first node with an id wins);
/// a descriptor naming a node outside the set is dropped. Only the first
/// descriptor seen for each [`LinkIdentity`] is kept, so the output is in
/// first-seen order.
pub fn collect_links<'a, I>(nodes: I) -> Vec<Link>
where
    I: IntoIterator<Item = &'a NodeRef>,
{
    let nodes: Vec<&NodeRef> = nodes.into_iter().collect();
    let mut by_id: HashMap<NodeId, &NodeRef> = HashMap::with_capacity(nodes.len());
    for node in &nodes {
        by_id.entry(node.id()).or_insert(*node);
    }

    let mut seen: HashSet<LinkIdentity> = HashSet::new();
    let mut dropped = 0;
    let mut links = Vec::new();
    for descriptor in gather_descriptors(nodes) {
        let (Some(start), Some(end)) = (by_id.get(&descriptor.start_node), by_id.get(&descriptor.end_node))
        else {
            dropped += 1;
            continue;
        };
        if seen.insert(descriptor.identity()) {
            links.push(Link::from_descriptor(&descriptor, (*start).clone(), (*end).clone()));
        }
    }
    if dropped > 0 {
        log::debug!("dropped {} link descriptor(s) naming nodes outside the content", dropped);
    }
    links
}
