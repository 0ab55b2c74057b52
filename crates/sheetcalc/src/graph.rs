//! Dependency graph traversals
//!
//! All walks run over the coordinate-keyed edges stored in each [`Cell`] and
//! use an explicit stack, so chain length never turns into call depth.
//! Cycle detection and evaluation ordering follow forward edges; invalidation
//! follows backward edges. Each keeps a visited set so shared sub-graphs are
//! walked once.

use ahash::AHashSet;
use sheetcalc_core::Position;

use crate::cell::Cell;

/// Check whether giving `target` a formula that reads `references` would
/// close a cycle
///
/// A cycle exists when `target` is reachable from any of `references` along
/// the current forward edges. The target's own current edges are irrelevant:
/// the walk stops as soon as it arrives there.
pub(crate) fn would_create_cycle<'a, F>(target: Position, references: &[Position], lookup: F) -> bool
where
    F: Fn(Position) -> Option<&'a Cell>,
{
    if references.contains(&target) {
        return true;
    }

    let mut visited = AHashSet::new();
    let mut stack: Vec<Position> = references.to_vec();

    while let Some(pos) = stack.pop() {
        if pos == target {
            return true;
        }
        if !visited.insert(pos) {
            continue;
        }
        if let Some(cell) = lookup(pos) {
            stack.extend(cell.forward_edges().iter().copied());
        }
    }

    false
}

/// Collect `start` and every cell that transitively depends on it
///
/// The result is in discovery order and contains each position once.
pub(crate) fn dependents_closure<'a, F>(start: Position, lookup: F) -> Vec<Position>
where
    F: Fn(Position) -> Option<&'a Cell>,
{
    let mut visited = AHashSet::new();
    let mut order = Vec::new();
    let mut stack = vec![start];

    while let Some(pos) = stack.pop() {
        if !visited.insert(pos) {
            continue;
        }
        order.push(pos);
        if let Some(cell) = lookup(pos) {
            stack.extend(cell.dependents());
        }
    }

    order
}

/// Formula cells that must be evaluated before `start`, dependencies first
///
/// The walk descends only through formulas without a cached result; cached
/// formulas and non-formula cells are already resolvable. `start` itself is
/// last when it needs evaluation. Requires an acyclic graph.
pub(crate) fn evaluation_order<'a, F>(start: Position, lookup: F) -> Vec<Position>
where
    F: Fn(Position) -> Option<&'a Cell>,
{
    let mut visited = AHashSet::new();
    let mut order = Vec::new();
    // (position, children already pushed)
    let mut stack = vec![(start, false)];

    while let Some((pos, expanded)) = stack.pop() {
        if expanded {
            order.push(pos);
            continue;
        }
        if !visited.insert(pos) {
            continue;
        }
        let Some(cell) = lookup(pos).filter(|cell| cell.needs_evaluation()) else {
            continue;
        };

        stack.push((pos, true));
        for &next in cell.forward_edges() {
            if !visited.contains(&next) {
                stack.push((next, false));
            }
        }
    }

    order
}
