//! Favorites-first ordering

use super::node::Node;

/// Stable partition: favorites first, arrival order kept inside each partition.
pub fn partition_favorites(nodes: Vec<Node>) -> Vec<Node> {
    let (mut favorites, others): (Vec<_>, Vec<_>) =
        nodes.into_iter().partition(|n| n.is_favorite);
    favorites.extend(others);
    favorites
}

/// Index at which a newly arrived node belongs.
///
/// The new node is the latest arrival, so it lands at the end of its partition.
pub fn insert_position(nodes: &[Node], node: &Node, favorites_first: bool) -> usize {
    if favorites_first && node.is_favorite {
        nodes
            .iter()
            .position(|n| !n.is_favorite)
            .unwrap_or(nodes.len())
    } else {
        nodes.len()
    }
}
