//! Credit aggregation over resolved course records.

use crate::model::{RecordStatus, ResolvedRecord};

/// Sum the effective credits of records in `group` (and `sub_group`, when
/// given) whose status is one of `statuses`.
///
/// All three filters must match. An empty record list sums to zero.
pub fn group_credits(
    records: &[ResolvedRecord],
    group: &str,
    sub_group: Option<&str>,
    statuses: &[RecordStatus],
) -> u32 {
    records
        .iter()
        .filter(|r| r.course.group == group)
        .filter(|r| sub_group.map_or(true, |sg| r.course.sub_group.as_deref() == Some(sg)))
        .filter(|r| statuses.contains(&r.record.status))
        .map(ResolvedRecord::effective_credits)
        .sum()
}

/// Program-wide credits of records whose status is one of `statuses`,
/// regardless of group.
pub fn total_credits(records: &[ResolvedRecord], statuses: &[RecordStatus]) -> u32 {
    records
        .iter()
        .filter(|r| statuses.contains(&r.record.status))
        .map(ResolvedRecord::effective_credits)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Course, CourseRecord};
    use crate::semester::TermPlacement;

    fn record(
        id: &str,
        credits: u32,
        group: &str,
        sub_group: Option<&str>,
        status: RecordStatus,
    ) -> ResolvedRecord {
        let mut course = Course::new(id, id, id, credits, group);
        course.sub_group = sub_group.map(Into::into);
        let mut record = CourseRecord::new(id, id, TermPlacement::default());
        record.status = status;
        ResolvedRecord { record, course }
    }

    fn sample() -> Vec<ResolvedRecord> {
        vec![
            record("a", 6, "A1", Some("S1"), RecordStatus::Passed),
            record("b", 5, "A1", Some("S2"), RecordStatus::Planned),
            record("c", 4, "A1", None, RecordStatus::InProgress),
            record("d", 3, "A1", Some("S1"), RecordStatus::Failed),
            record("e", 9, "A3", None, RecordStatus::Passed),
        ]
    }

    #[test]
    fn empty_records_sum_to_zero() {
        assert_eq!(group_credits(&[], "A1", None, RecordStatus::EARNED), 0);
        assert_eq!(total_credits(&[], RecordStatus::PENDING), 0);
    }

    #[test]
    fn filters_by_group_and_status() {
        let records = sample();
        assert_eq!(group_credits(&records, "A1", None, RecordStatus::EARNED), 6);
        assert_eq!(group_credits(&records, "A1", None, RecordStatus::PENDING), 9);
        assert_eq!(
            group_credits(&records, "A1", None, &[RecordStatus::Failed]),
            3
        );
        assert_eq!(group_credits(&records, "A9", None, RecordStatus::EARNED), 0);
    }

    #[test]
    fn sub_group_filter_is_conjunctive() {
        let records = sample();
        assert_eq!(
            group_credits(&records, "A1", Some("S1"), RecordStatus::EARNED),
            6
        );
        assert_eq!(
            group_credits(&records, "A1", Some("S2"), RecordStatus::EARNED),
            0
        );
        assert_eq!(
            group_credits(&records, "A1", Some("S2"), RecordStatus::PENDING),
            5
        );
        // Sub-group S1 exists only under A1.
        assert_eq!(
            group_credits(&records, "A3", Some("S1"), RecordStatus::EARNED),
            0
        );
    }

    #[test]
    fn override_replaces_nominal_credits() {
        let mut records = sample();
        records[0].record.credit_override = Some(2);
        assert_eq!(group_credits(&records, "A1", None, RecordStatus::EARNED), 2);
    }

    #[test]
    fn removing_a_record_never_increases_a_sum() {
        let records = sample();
        for skip in 0..records.len() {
            let fewer: Vec<ResolvedRecord> = records
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != skip)
                .map(|(_, r)| r.clone())
                .collect();
            for statuses in [RecordStatus::EARNED, RecordStatus::PENDING] {
                for group in ["A1", "A3"] {
                    assert!(
                        group_credits(&fewer, group, None, statuses)
                            <= group_credits(&records, group, None, statuses)
                    );
                }
            }
        }
    }

    #[test]
    fn totals_ignore_groups() {
        let records = sample();
        assert_eq!(total_credits(&records, RecordStatus::EARNED), 15);
        assert_eq!(total_credits(&records, RecordStatus::PENDING), 9);
    }
}
