// ── Grade aggregation ──
//
// Client-side statistics over fetched grades. The server computes its
// own class reports; these helpers cover the dashboard widgets and CLI
// summaries that work from an already-fetched grade list.

use std::collections::BTreeMap;

use skolr_api::models::{Grade, Subject, SubjectAverage};

/// Summary statistics over a set of grades.
#[derive(Debug, Clone, PartialEq)]
pub struct GradeStats {
    pub count: usize,
    pub average: f64,
    pub min: f64,
    pub max: f64,
}

/// Mean grade value, `None` for an empty set.
pub fn average(grades: &[Grade]) -> Option<f64> {
    if grades.is_empty() {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let mean = grades.iter().map(|g| g.value).sum::<f64>() / grades.len() as f64;
    Some(mean)
}

/// Count, mean, min, and max over a set of grades.
pub fn stats(grades: &[Grade]) -> Option<GradeStats> {
    let average = average(grades)?;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for g in grades {
        min = min.min(g.value);
        max = max.max(g.value);
    }
    Some(GradeStats {
        count: grades.len(),
        average,
        min,
        max,
    })
}

/// Per-subject averages, ordered by subject name. Grades whose subject
/// is missing from `subjects` are skipped; subjects without grades are
/// omitted rather than reported as zero.
pub fn subject_averages(grades: &[Grade], subjects: &[Subject]) -> Vec<SubjectAverage> {
    let mut buckets: BTreeMap<i64, (f64, u64)> = BTreeMap::new();
    for g in grades {
        let bucket = buckets.entry(g.subject_id).or_insert((0.0, 0));
        bucket.0 += g.value;
        bucket.1 += 1;
    }

    let mut out: Vec<SubjectAverage> = subjects
        .iter()
        .filter_map(|subject| {
            let (sum, count) = buckets.get(&subject.id).copied()?;
            #[allow(clippy::cast_precision_loss)]
            let average = sum / count as f64;
            Some(SubjectAverage {
                subject_id: subject.id,
                subject_name: subject.name.clone(),
                average,
                grade_count: count,
            })
        })
        .collect();
    out.sort_by(|a, b| a.subject_name.cmp(&b.subject_name));
    out
}

/// Average per student id, for class-wide views.
pub fn student_averages(grades: &[Grade]) -> BTreeMap<i64, f64> {
    let mut buckets: BTreeMap<i64, (f64, u64)> = BTreeMap::new();
    for g in grades {
        let bucket = buckets.entry(g.student_id).or_insert((0.0, 0));
        bucket.0 += g.value;
        bucket.1 += 1;
    }
    buckets
        .into_iter()
        .map(|(student_id, (sum, count))| {
            #[allow(clippy::cast_precision_loss)]
            let avg = sum / count as f64;
            (student_id, avg)
        })
        .collect()
}

/// The `n` most recent grades, newest first. Ties keep input order.
pub fn recent(grades: &[Grade], n: usize) -> Vec<Grade> {
    let mut sorted: Vec<Grade> = grades.to_vec();
    sorted.sort_by(|a, b| b.graded_at.cmp(&a.graded_at));
    sorted.truncate(n);
    sorted
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn grade(id: i64, student_id: i64, subject_id: i64, value: f64, day: u32) -> Grade {
        Grade {
            id,
            student_id,
            subject_id,
            value,
            comment: None,
            graded_at: Utc.with_ymd_and_hms(2026, 3, day, 10, 0, 0).unwrap(),
            teacher_id: None,
        }
    }

    fn subject(id: i64, name: &str) -> Subject {
        Subject {
            id,
            name: name.into(),
            code: None,
        }
    }

    #[test]
    fn empty_grade_set_has_no_average() {
        assert!(average(&[]).is_none());
        assert!(stats(&[]).is_none());
    }

    #[test]
    fn stats_cover_count_mean_min_max() {
        let grades = [
            grade(1, 1, 1, 2.0, 1),
            grade(2, 1, 1, 4.0, 2),
            grade(3, 2, 1, 6.0, 3),
        ];
        let s = stats(&grades).unwrap();
        assert_eq!(s.count, 3);
        assert!((s.average - 4.0).abs() < f64::EPSILON);
        assert!((s.min - 2.0).abs() < f64::EPSILON);
        assert!((s.max - 6.0).abs() < f64::EPSILON);
    }

    #[test]
    fn subject_averages_are_name_ordered_and_skip_gradeless_subjects() {
        let grades = [
            grade(1, 1, 10, 4.0, 1),
            grade(2, 2, 10, 5.0, 2),
            grade(3, 1, 20, 3.0, 3),
        ];
        let subjects = [
            subject(10, "Mathematics"),
            subject(20, "Biology"),
            subject(30, "Chemistry"),
        ];

        let averages = subject_averages(&grades, &subjects);

        assert_eq!(averages.len(), 2);
        assert_eq!(averages[0].subject_name, "Biology");
        assert!((averages[0].average - 3.0).abs() < f64::EPSILON);
        assert_eq!(averages[1].subject_name, "Mathematics");
        assert!((averages[1].average - 4.5).abs() < f64::EPSILON);
        assert_eq!(averages[1].grade_count, 2);
    }

    #[test]
    fn unknown_subject_grades_are_skipped() {
        let grades = [grade(1, 1, 99, 5.0, 1)];
        let subjects = [subject(10, "Mathematics")];
        assert!(subject_averages(&grades, &subjects).is_empty());
    }

    #[test]
    fn student_averages_bucket_by_student() {
        let grades = [
            grade(1, 1, 10, 4.0, 1),
            grade(2, 1, 20, 2.0, 2),
            grade(3, 2, 10, 5.0, 3),
        ];
        let averages = student_averages(&grades);
        assert!((averages[&1] - 3.0).abs() < f64::EPSILON);
        assert!((averages[&2] - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn recent_returns_newest_first_and_truncates() {
        let grades = [
            grade(1, 1, 10, 4.0, 1),
            grade(2, 1, 10, 5.0, 15),
            grade(3, 1, 10, 3.0, 8),
        ];
        let top2 = recent(&grades, 2);
        assert_eq!(top2.len(), 2);
        assert_eq!(top2[0].id, 2);
        assert_eq!(top2[1].id, 3);
    }
}
