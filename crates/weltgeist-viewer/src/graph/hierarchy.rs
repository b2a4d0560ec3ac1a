use std::collections::{HashMap, HashSet};

use weltgeist_core::{
    Category, CategoryId, CategoryPatch, CoreError, CoreResult, EntityKind, HierarchyLevel,
};

/// Category list validated as a forest.
///
/// Built once per change: parent/child links are checked and cycles rejected
/// here, so traversal never has to guard against loops.
#[derive(Debug, Clone, Default)]
pub struct CategoryTree {
    categories: Vec<Category>,
    index: HashMap<CategoryId, usize>,
}

impl CategoryTree {
    pub fn build(categories: Vec<Category>) -> CoreResult<Self> {
        let mut index = HashMap::with_capacity(categories.len());
        for (i, cat) in categories.iter().enumerate() {
            if index.insert(cat.id.clone(), i).is_some() {
                return Err(CoreError::duplicate(EntityKind::Category, &cat.id));
            }
        }

        for cat in &categories {
            if let Some(parent) = &cat.parent {
                if !index.contains_key(parent) {
                    return Err(CoreError::InvalidHierarchy(format!(
                        "{} names unknown parent {}",
                        cat.id, parent
                    )));
                }
            }
            for child in &cat.children {
                let Some(child_cat) = index.get(child).map(|&i| &categories[i]) else {
                    return Err(CoreError::InvalidHierarchy(format!(
                        "{} lists unknown child {}",
                        cat.id, child
                    )));
                };
                if child_cat.parent.as_ref() != Some(&cat.id) {
                    return Err(CoreError::InvalidHierarchy(format!(
                        "{} lists {} as child, but its parent is {}",
                        cat.id,
                        child,
                        child_cat
                            .parent
                            .as_ref()
                            .map(|p| p.0.as_str())
                            .unwrap_or("(none)")
                    )));
                }
            }
        }

        for cat in &categories {
            let mut seen: HashSet<&CategoryId> = HashSet::new();
            let mut cur = Some(&cat.id);
            while let Some(id) = cur {
                if !seen.insert(id) {
                    return Err(CoreError::InvalidHierarchy(format!(
                        "parent chain of {} forms a cycle",
                        cat.id
                    )));
                }
                cur = index
                    .get(id)
                    .and_then(|&i| categories[i].parent.as_ref());
            }
        }

        Ok(Self { categories, index })
    }

    pub fn get(&self, id: &CategoryId) -> Option<&Category> {
        self.index.get(id).map(|&i| &self.categories[i])
    }

    pub fn contains(&self, id: &CategoryId) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    pub fn as_slice(&self) -> &[Category] {
        &self.categories
    }

    /// Position in insertion order; the lane layout stacks lanes by it.
    pub fn lane_index(&self, id: &CategoryId) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn at_level(&self, level: HierarchyLevel) -> impl Iterator<Item = &Category> {
        self.categories.iter().filter(move |c| c.level == level)
    }

    /// Categories heading a legend section: no parent, or a parent on another level.
    pub fn roots_at(&self, level: HierarchyLevel) -> Vec<&Category> {
        self.at_level(level)
            .filter(|c| match &c.parent {
                None => true,
                Some(p) => self.get(p).map(|p| p.level != level).unwrap_or(true),
            })
            .collect()
    }

    pub fn children_of(&self, id: &CategoryId) -> Vec<&Category> {
        let mut kids: Vec<&Category> = self
            .categories
            .iter()
            .filter(|c| c.parent.as_ref() == Some(id))
            .collect();
        sort_siblings(&mut kids);
        kids
    }

    pub fn descendants_of(&self, id: &CategoryId) -> Vec<&Category> {
        let mut out = Vec::new();
        let mut stack = self.children_of(id);
        stack.reverse();
        while let Some(cat) = stack.pop() {
            out.push(cat);
            let mut kids = self.children_of(&cat.id);
            kids.reverse();
            stack.extend(kids);
        }
        out
    }

    pub fn with_added(&self, category: Category) -> CoreResult<Self> {
        if self.contains(&category.id) {
            return Err(CoreError::duplicate(EntityKind::Category, &category.id));
        }
        let mut next = self.categories.clone();
        next.push(category);
        Self::build(next)
    }

    pub fn with_updated(&self, id: &CategoryId, patch: CategoryPatch) -> CoreResult<Self> {
        let Some(&i) = self.index.get(id) else {
            return Err(CoreError::not_found(EntityKind::Category, id));
        };
        let mut next = self.categories.clone();
        next[i].apply_patch(patch);
        Self::build(next)
    }

    /// Detaches the category from its relatives; former children become roots.
    pub fn with_removed(&self, id: &CategoryId) -> CoreResult<(Self, Category)> {
        let Some(&i) = self.index.get(id) else {
            return Err(CoreError::not_found(EntityKind::Category, id));
        };
        let mut next = self.categories.clone();
        let removed = next.remove(i);
        for cat in next.iter_mut() {
            cat.children.retain(|c| c != id);
            if cat.parent.as_ref() == Some(id) {
                cat.parent = None;
            }
        }
        Ok((Self::build(next)?, removed))
    }
}

fn sort_siblings(children: &mut [&Category]) {
    children.sort_by(|a, b| {
        a.level
            .cmp(&b.level)
            .then_with(|| a.position.cmp(&b.position))
            .then_with(|| a.id.cmp(&b.id))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use weltgeist_core::seed;

    fn ids(cats: &[&Category]) -> Vec<String> {
        cats.iter().map(|c| c.id.0.clone()).collect()
    }

    #[test]
    fn seed_hierarchy_is_valid() {
        let tree = CategoryTree::build(seed::categories()).expect("seed tree");
        assert_eq!(tree.len(), 11);
        assert_eq!(tree.lane_index(&"politics".into()), Some(1));
    }

    #[test]
    fn children_sorted_by_level_then_position() {
        let tree = CategoryTree::build(seed::categories()).unwrap();
        let kids = tree.children_of(&"weltgeist".into());
        assert_eq!(
            ids(&kids),
            vec!["politics", "economics", "language", "zeitgeist"]
        );
    }

    #[test]
    fn roots_at_level_skip_same_level_children() {
        let tree = CategoryTree::build(seed::categories()).unwrap();
        assert_eq!(ids(&tree.roots_at(HierarchyLevel::Weltgeist)), vec!["weltgeist"]);
        assert_eq!(ids(&tree.roots_at(HierarchyLevel::Zeitgeist)), vec!["zeitgeist"]);
        assert_eq!(ids(&tree.roots_at(HierarchyLevel::Dna)), vec!["dna"]);
    }

    #[test]
    fn descendants_walk_whole_subtree() {
        let tree = CategoryTree::build(seed::categories()).unwrap();
        let all = tree.descendants_of(&"zeitgeist".into());
        assert_eq!(
            ids(&all),
            vec!["technology", "religion", "science", "geist", "biology", "dna"]
        );
    }

    #[test]
    fn rejects_child_with_mismatched_parent() {
        let cats = vec![
            Category::new("a", "A", "#000", HierarchyLevel::Weltgeist, 0).with_children(&["b"]),
            Category::new("b", "B", "#000", HierarchyLevel::Weltgeist, 1),
        ];
        let err = CategoryTree::build(cats).unwrap_err();
        assert!(matches!(err, CoreError::InvalidHierarchy(_)));
    }

    #[test]
    fn rejects_parent_cycle() {
        let cats = vec![
            Category::new("a", "A", "#000", HierarchyLevel::Geist, 0).with_parent("b"),
            Category::new("b", "B", "#000", HierarchyLevel::Geist, 1).with_parent("a"),
        ];
        let err = CategoryTree::build(cats).unwrap_err();
        assert!(err.to_string().contains("cycle"));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let cats = vec![
            Category::new("a", "A", "#000", HierarchyLevel::Geist, 0),
            Category::new("a", "A2", "#111", HierarchyLevel::Geist, 1),
        ];
        assert_eq!(
            CategoryTree::build(cats).unwrap_err(),
            CoreError::duplicate(EntityKind::Category, "a")
        );
    }

    #[test]
    fn removal_detaches_relatives() {
        let tree = CategoryTree::build(seed::categories()).unwrap();
        let (next, removed) = tree.with_removed(&"zeitgeist".into()).unwrap();
        assert_eq!(removed.id.0, "zeitgeist");
        assert!(!next.contains(&"zeitgeist".into()));
        assert_eq!(next.get(&"technology".into()).unwrap().parent, None);
        assert_eq!(next.get(&"geist".into()).unwrap().parent, None);
        // input tree untouched
        assert_eq!(tree.len(), 11);
    }

    #[test]
    fn update_revalidates() {
        let tree = CategoryTree::build(seed::categories()).unwrap();
        let err = tree
            .with_updated(
                &"weltgeist".into(),
                CategoryPatch {
                    parent: Some(Some("dna".into())),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidHierarchy(_)));
    }
}
