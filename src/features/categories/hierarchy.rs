//! Forest-shaped hierarchy logic over a flat snapshot of the category table.
//!
//! A [`Forest`] indexes categories by id and resolves parents by key lookup.
//! Every walk up or down the forest is iterative and bounded by the number
//! of nodes, so a corrupted chain (a loop written behind our back) ends the
//! walk instead of spinning forever.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::iter::FusedIterator;

use crate::features::categories::error::{CategoryError, CategoryResult, CycleKind};
use crate::features::categories::models::{Category, CategoryId};
use crate::shared::constants::{PATH_SEPARATOR, TOP_LEVEL_LABEL};

/// Id-keyed snapshot of every category
#[derive(Debug, Clone, Default)]
pub struct Forest {
    nodes: HashMap<CategoryId, Category>,
}

impl Forest {
    pub fn new(categories: impl IntoIterator<Item = Category>) -> Self {
        Self {
            nodes: categories.into_iter().map(|c| (c.id, c)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: CategoryId) -> Option<&Category> {
        self.nodes.get(&id)
    }

    pub fn contains(&self, id: CategoryId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub(crate) fn get_mut(&mut self, id: CategoryId) -> Option<&mut Category> {
        self.nodes.get_mut(&id)
    }

    pub(crate) fn insert(&mut self, category: Category) {
        self.nodes.insert(category.id, category);
    }

    pub(crate) fn remove(&mut self, id: CategoryId) -> Option<Category> {
        self.nodes.remove(&id)
    }

    /// All categories ordered by name, id breaking ties
    pub fn sorted(&self) -> Vec<&Category> {
        let mut all: Vec<&Category> = self.nodes.values().collect();
        sort_by_name(&mut all);
        all
    }

    pub fn count_children(&self, id: CategoryId) -> usize {
        self.nodes
            .values()
            .filter(|c| c.parent_id == Some(id))
            .count()
    }

    /// Direct children of `id`, ordered by name
    pub fn children(&self, id: CategoryId) -> Vec<&Category> {
        let mut children: Vec<&Category> = self
            .nodes
            .values()
            .filter(|c| c.parent_id == Some(id))
            .collect();
        sort_by_name(&mut children);
        children
    }

    /// Children grouped by parent key; roots sit under `None`. Each group is
    /// ordered by name.
    pub fn children_index(&self) -> HashMap<Option<CategoryId>, Vec<&Category>> {
        let mut index: HashMap<Option<CategoryId>, Vec<&Category>> = HashMap::new();
        for category in self.nodes.values() {
            index.entry(category.parent_id).or_default().push(category);
        }
        for group in index.values_mut() {
            sort_by_name(group);
        }
        index
    }

    /// Check that `new_parent` may become the parent of `node`.
    ///
    /// `node` is `None` when the category is still being created. The walk
    /// climbs from `new_parent` towards a root; meeting `node` on the way
    /// means the assignment would close a loop. A dangling parent link ends
    /// the walk as if it were a root.
    pub fn check_parent(
        &self,
        node: Option<CategoryId>,
        new_parent: CategoryId,
    ) -> CategoryResult<()> {
        if node == Some(new_parent) {
            return Err(CycleKind::SelfParent.into());
        }
        if !self.contains(new_parent) {
            return Err(CategoryError::ParentNotFound(new_parent));
        }

        let mut current = Some(new_parent);
        let mut visited = 0usize;
        while let Some(id) = current {
            if Some(id) == node {
                return Err(CycleKind::DescendantParent.into());
            }
            visited += 1;
            if visited > self.len() {
                return Err(CategoryError::Consistency(new_parent));
            }
            current = self.get(id).and_then(|c| c.parent_id);
        }

        Ok(())
    }

    /// Lazily walk the ancestors of `id`, nearest first.
    ///
    /// Yields nothing for a root or an unknown id. Calling it again gives a
    /// fresh walk over the same snapshot.
    pub fn ancestors(&self, id: CategoryId) -> Ancestors<'_> {
        Ancestors {
            forest: self,
            next: self.get(id).and_then(|c| c.parent_id),
            remaining: self.len(),
        }
    }

    /// Ancestor names of `id`, root first, the node itself excluded
    pub fn breadcrumb(&self, id: CategoryId) -> Breadcrumb {
        let mut names: Vec<String> = self.ancestors(id).map(|c| c.name.clone()).collect();
        names.reverse();
        Breadcrumb(names)
    }

    /// Every category below `id`, breadth-first
    pub fn descendants(&self, id: CategoryId) -> Vec<&Category> {
        let index = self.children_index();
        let mut seen: HashSet<CategoryId> = HashSet::from([id]);
        let mut found = Vec::new();
        let mut queue = VecDeque::from([id]);

        while let Some(current) = queue.pop_front() {
            let Some(children) = index.get(&Some(current)) else {
                continue;
            };
            for child in children {
                if seen.insert(child.id) {
                    found.push(*child);
                    queue.push_back(child.id);
                }
            }
        }

        found
    }
}

/// Reject the deletion of a category that still has children
pub fn authorize_delete(id: CategoryId, child_count: i64) -> CategoryResult<()> {
    if child_count > 0 {
        return Err(CategoryError::HasChildren(id));
    }
    Ok(())
}

/// Byte-wise by name, then id; Postgres lists with `COLLATE "C"` to agree
fn sort_by_name(categories: &mut [&Category]) {
    categories.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
}

/// Iterator over the ancestors of a category, nearest first
#[derive(Debug, Clone)]
pub struct Ancestors<'a> {
    forest: &'a Forest,
    next: Option<CategoryId>,
    remaining: usize,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a Category;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next.take()?;
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let category = self.forest.get(id)?;
        self.next = category.parent_id;
        Some(category)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.next {
            Some(_) => (0, Some(self.remaining)),
            None => (0, Some(0)),
        }
    }
}

impl FusedIterator for Ancestors<'_> {}

/// Root-first ancestor names of a category
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Breadcrumb(Vec<String>);

impl Breadcrumb {
    pub fn is_top_level(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn into_names(self) -> Vec<String> {
        self.0
    }
}

impl fmt::Display for Breadcrumb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_top_level() {
            f.write_str(TOP_LEVEL_LABEL)
        } else {
            f.write_str(&self.0.join(PATH_SEPARATOR))
        }
    }
}
