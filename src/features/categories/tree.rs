//! Pure tree assembly over a flat category listing.
//!
//! Nothing here touches the store: callers fetch the records first and pass
//! them in, so the same input always yields the same forest.

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::features::categories::dtos::CategoryTreeDto;
use crate::features::categories::models::Category;

/// Assemble a flat list of categories into a forest.
///
/// Every record appears exactly once in the output. A record whose parent is
/// not part of `categories` is returned as a root. Sibling order follows the
/// input order.
pub fn build_tree(categories: &[Category]) -> Vec<CategoryTreeDto> {
    let index: HashMap<Uuid, usize> = categories
        .iter()
        .enumerate()
        .map(|(i, c)| (c.id, i))
        .collect();

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); categories.len()];
    let mut roots = Vec::new();

    for (i, category) in categories.iter().enumerate() {
        match category.parent_id.and_then(|p| index.get(&p)) {
            Some(&parent) => children[parent].push(i),
            None => roots.push(i),
        }
    }

    let mut visited = vec![false; categories.len()];
    let mut forest = Vec::with_capacity(roots.len());

    for root in roots {
        materialize_into(root, categories, &children, &mut visited, &mut forest);
    }

    // Anything left over sits on a parent cycle and is unreachable from a
    // root; the first record of each cycle (in input order) becomes a root.
    for i in 0..categories.len() {
        if !visited[i] {
            materialize_into(i, categories, &children, &mut visited, &mut forest);
        }
    }

    forest
}

/// Build the subtree under `root` without recursion and push it onto `out`.
fn materialize_into(
    root: usize,
    categories: &[Category],
    children: &[Vec<usize>],
    visited: &mut [bool],
    out: &mut Vec<CategoryTreeDto>,
) {
    struct Frame {
        index: usize,
        next_child: usize,
        node: CategoryTreeDto,
    }

    visited[root] = true;
    let mut stack = vec![Frame {
        index: root,
        next_child: 0,
        node: CategoryTreeDto::leaf(&categories[root]),
    }];

    while let Some(frame) = stack.last_mut() {
        if let Some(&child) = children[frame.index].get(frame.next_child) {
            frame.next_child += 1;
            if !visited[child] {
                visited[child] = true;
                stack.push(Frame {
                    index: child,
                    next_child: 0,
                    node: CategoryTreeDto::leaf(&categories[child]),
                });
            }
            continue;
        }

        if let Some(done) = stack.pop() {
            match stack.last_mut() {
                Some(parent) => parent.node.children.push(done.node),
                None => out.push(done.node),
            }
        }
    }
}

/// Ids of every descendant of `category_id`, depth-first.
///
/// A node is listed before its own descendants and siblings keep their input
/// order. `category_id` itself is never included, and each id is listed at
/// most once even if the parent links loop back.
pub fn descendant_ids(category_id: Uuid, categories: &[Category]) -> Vec<Uuid> {
    let mut children_of: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    for category in categories {
        if let Some(parent_id) = category.parent_id {
            children_of.entry(parent_id).or_default().push(category.id);
        }
    }

    let mut seen = HashSet::from([category_id]);
    let mut descendants = Vec::new();
    let mut stack: Vec<Uuid> = children_of
        .get(&category_id)
        .map(|ids| ids.iter().rev().copied().collect())
        .unwrap_or_default();

    while let Some(id) = stack.pop() {
        if !seen.insert(id) {
            continue;
        }
        descendants.push(id);
        if let Some(ids) = children_of.get(&id) {
            stack.extend(ids.iter().rev().copied());
        }
    }

    descendants
}
