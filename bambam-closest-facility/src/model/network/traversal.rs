/// which adjacency of a vertex a search walks. outgoing lists the edges a
/// vehicle may leave the vertex on, incoming lists the edges it may arrive on.
/// a search rooted at an incident walks outgoing edges when routes run to the
/// facilities and incoming edges when they run from them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Traversal {
    Outgoing,
    Incoming,
}
