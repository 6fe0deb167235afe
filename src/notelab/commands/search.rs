use crate::model::{Note, Project, Section, Tree};
use std::sync::Arc;

/// True if `query` is empty or appears (case-insensitively) in the note's title,
/// content, or any of its tags.
pub fn matches(note: &Note, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let query = query.to_lowercase();
    note.title.to_lowercase().contains(&query)
        || note.content.to_lowercase().contains(&query)
        || note.tags.iter().any(|t| t.to_lowercase().contains(&query))
}

/// Derives the subset of `tree` to display for `query`.
///
/// An empty query returns the tree as is. Otherwise only matching notes survive, and
/// sections and projects left with nothing in them are dropped. Untouched entities
/// are shared with the source tree, which is never modified.
pub fn filter_tree(tree: &Tree, query: &str) -> Tree {
    if query.is_empty() {
        return tree.clone();
    }

    let projects = tree
        .projects
        .iter()
        .filter_map(|project| filter_project(project, query))
        .collect();
    Tree { projects }
}

fn filter_project(project: &Arc<Project>, query: &str) -> Option<Arc<Project>> {
    let sections: Vec<Arc<Section>> = project
        .sections
        .iter()
        .filter_map(|section| filter_section(section, query))
        .collect();

    if sections.is_empty() {
        return None;
    }
    if sections.len() == project.sections.len()
        && sections
            .iter()
            .zip(&project.sections)
            .all(|(a, b)| Arc::ptr_eq(a, b))
    {
        return Some(Arc::clone(project));
    }
    Some(Arc::new(Project {
        id: project.id.clone(),
        name: project.name.clone(),
        sections,
    }))
}

fn filter_section(section: &Arc<Section>, query: &str) -> Option<Arc<Section>> {
    let notes: Vec<Arc<Note>> = section
        .notes
        .iter()
        .filter(|note| matches(note, query))
        .cloned()
        .collect();

    if notes.is_empty() {
        return None;
    }
    if notes.len() == section.notes.len() {
        return Some(Arc::clone(section));
    }
    Some(Arc::new(Section {
        id: section.id.clone(),
        name: section.name.clone(),
        notes,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::TreeFixture;

    fn base() -> Tree {
        TreeFixture::new()
            .with_project("p1", "Web")
            .with_section("p1", "s1", "HTML")
            .with_note("p1", "s1", "n1", "Forms", "<form>inputs</form>")
            .with_note("p1", "s1", "n2", "Tables", "<table></table>")
            .with_section("p1", "s2", "CSS")
            .with_note("p1", "s2", "n3", "Flexbox", "display: flex")
            .with_project("p2", "Networks")
            .with_section("p2", "s3", "Labs")
            .with_note("p2", "s3", "n4", "VLANs", "trunk ports")
            .with_tags("n4", &["Cisco", "exam"])
            .with_project("p3", "Empty")
            .build()
    }

    #[test]
    fn matches_title_content_and_tags_case_insensitively() {
        let tree = base();
        let forms = tree.note("n1").unwrap();
        assert!(matches(forms, "FORMS"));
        assert!(matches(forms, "Input"));
        assert!(!matches(forms, "table"));

        let vlans = tree.note("n4").unwrap();
        assert!(matches(vlans, "cisco"));
        assert!(matches(vlans, "EXA"));
        assert!(matches(vlans, ""));
    }

    #[test]
    fn empty_query_returns_tree_unchanged() {
        let tree = base();
        let filtered = filter_tree(&tree, "");
        assert_eq!(filtered, tree);
        assert_eq!(filtered.projects.len(), 3);
    }

    #[test]
    fn prunes_empty_sections_and_projects() {
        let tree = base();
        let filtered = filter_tree(&tree, "flex");

        assert_eq!(filtered.projects.len(), 1);
        let project = &filtered.projects[0];
        assert_eq!(project.id, "p1");
        assert_eq!(project.sections.len(), 1);
        assert_eq!(project.sections[0].id, "s2");
        assert_eq!(project.sections[0].notes[0].id, "n3");
    }

    #[test]
    fn every_surviving_note_matches() {
        let tree = base();
        for query in ["t", "TABLE", "exam", "zzz", "<"] {
            let filtered = filter_tree(&tree, query);
            for project in &filtered.projects {
                assert!(!project.sections.is_empty());
                for section in &project.sections {
                    assert!(!section.notes.is_empty());
                }
            }
            for (_, _, note) in filtered.notes() {
                assert!(matches(note, query), "{} should match {}", note.id, query);
            }
        }
    }

    #[test]
    fn source_tree_is_not_modified() {
        let tree = base();
        let snapshot = tree.clone();
        let _ = filter_tree(&tree, "vlan");
        assert_eq!(tree, snapshot);
    }

    #[test]
    fn fully_matching_sections_are_shared() {
        let tree = base();
        let filtered = filter_tree(&tree, "trunk");
        assert!(Arc::ptr_eq(&filtered.projects[0], &tree.projects[1]));
    }
}
