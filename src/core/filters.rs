use crate::models::{Category, Participant};

/// Check whether either participant excludes the other
///
/// Exclusions are only stored on the participant that was edited, so the
/// check looks at both lists.
#[inline]
pub fn is_excluded(p1: &Participant, p2: &Participant) -> bool {
    p1.excludes(&p2.id) || p2.excludes(&p1.id)
}

/// Check whether the two categories allow one of them to coach the other
#[inline]
pub fn categories_compatible(p1: &Participant, p2: &Participant) -> bool {
    !matches!(
        (p1.category, p2.category),
        (Category::CoachOnly, Category::CoachOnly) | (Category::CoacheeOnly, Category::CoacheeOnly)
    )
}

/// Check if two available participants may be put together in open matching
#[inline]
pub fn can_pair(p1: &Participant, p2: &Participant, respect_exclusions: bool) -> bool {
    if p1.id == p2.id {
        return false;
    }

    if !categories_compatible(p1, p2) {
        return false;
    }

    !(respect_exclusions && is_excluded(p1, p2))
}

/// Roster split by category, preserving roster order within each group
#[derive(Debug, Default)]
pub struct CategoryPartition<'a> {
    pub coach_only: Vec<&'a Participant>,
    pub coachee_only: Vec<&'a Participant>,
    pub both: Vec<&'a Participant>,
}

pub fn partition_by_category(roster: &[Participant]) -> CategoryPartition<'_> {
    let mut partition = CategoryPartition::default();
    for p in roster {
        match p.category {
            Category::CoachOnly => partition.coach_only.push(p),
            Category::CoacheeOnly => partition.coachee_only.push(p),
            Category::Both => partition.both.push(p),
        }
    }
    partition
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_participant(id: &str, category: Category) -> Participant {
        Participant::new(id, format!("Person {}", id), category)
    }

    #[test]
    fn test_exclusion_either_side() {
        let a = create_participant("a", Category::Both).excluding("b");
        let b = create_participant("b", Category::Both);

        assert!(is_excluded(&a, &b));
        assert!(is_excluded(&b, &a));
    }

    #[test]
    fn test_no_exclusion() {
        let a = create_participant("a", Category::Both).excluding("c");
        let b = create_participant("b", Category::Both);

        assert!(!is_excluded(&a, &b));
    }

    #[test]
    fn test_can_pair_ignores_exclusions_when_disabled() {
        let a = create_participant("a", Category::Both).excluding("b");
        let b = create_participant("b", Category::Both);

        assert!(!can_pair(&a, &b, true));
        assert!(can_pair(&a, &b, false));
    }

    #[test]
    fn test_same_restricted_category_incompatible() {
        let c1 = create_participant("c1", Category::CoachOnly);
        let c2 = create_participant("c2", Category::CoachOnly);
        let e1 = create_participant("e1", Category::CoacheeOnly);
        let e2 = create_participant("e2", Category::CoacheeOnly);
        let b = create_participant("b", Category::Both);

        assert!(!can_pair(&c1, &c2, false));
        assert!(!can_pair(&e1, &e2, false));
        assert!(can_pair(&c1, &e1, false));
        assert!(can_pair(&b, &c1, false));
        assert!(can_pair(&b, &e2, false));
    }

    #[test]
    fn test_partition_keeps_order() {
        let roster = vec![
            create_participant("1", Category::Both),
            create_participant("2", Category::CoachOnly),
            create_participant("3", Category::CoacheeOnly),
            create_participant("4", Category::CoachOnly),
        ];

        let partition = partition_by_category(&roster);

        let coach_ids: Vec<_> = partition.coach_only.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(coach_ids, vec!["2", "4"]);
        assert_eq!(partition.coachee_only.len(), 1);
        assert_eq!(partition.both.len(), 1);
    }
}
