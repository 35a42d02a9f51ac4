//! Topic mastery analysis on top of the weight solver.
//!
//! Each answered item becomes one row of a one-hot design matrix (a 1 in the
//! column of the topic it tests) and one outcome (1 correct, 0 wrong). With
//! that design the least-squares weight of a topic is its accuracy, and the
//! pseudo-inverse gives 0 to topics that were never asked.
//!
//! Weights are then mapped to 0..=100 scores for display.

use crate::domain::{AnalysisInput, DesignMatrix, ExamItem, TopicScore};
use crate::error::{AppError, ComputationError};
use crate::solver::WeightSolver;

/// One-hot design built from exam items.
#[derive(Debug, Clone)]
pub struct TopicDesign {
    pub matrix: DesignMatrix,
    pub outcomes: Vec<f64>,
    /// Items whose topic is not in the topic list.
    pub skipped: usize,
}

/// Analysis output.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub scores: Vec<TopicScore>,
    pub items_used: usize,
    pub items_skipped: usize,
}

/// Build the one-hot design. Items with an unknown topic are skipped.
pub fn build_design(topics: &[String], items: &[ExamItem]) -> Result<TopicDesign, ComputationError> {
    let mut rows = Vec::with_capacity(items.len());
    let mut outcomes = Vec::with_capacity(items.len());
    let mut skipped = 0;

    for item in items {
        let Some(idx) = topics.iter().position(|t| *t == item.topic) else {
            skipped += 1;
            continue;
        };
        let mut row = vec![0.0; topics.len()];
        row[idx] = 1.0;
        rows.push(row);
        outcomes.push(if item.correct { 1.0 } else { 0.0 });
    }

    let matrix = DesignMatrix::from_rows(rows)?;
    Ok(TopicDesign {
        matrix,
        outcomes,
        skipped,
    })
}

/// Map a raw weight to a 0..=100 score: clamp to `[0, 1]`, scale, round.
pub fn weight_to_score(weight: f64) -> u8 {
    if !weight.is_finite() {
        return 0;
    }
    (weight.clamp(0.0, 1.0) * 100.0).round() as u8
}

/// Pair each topic with its weight (missing weights count as 0).
pub fn score_topics(topics: &[String], weights: &[f64]) -> Vec<TopicScore> {
    topics
        .iter()
        .enumerate()
        .map(|(i, topic)| {
            let weight = weights.get(i).copied().filter(|w| w.is_finite()).unwrap_or(0.0);
            TopicScore {
                topic: topic.clone(),
                weight,
                score: weight_to_score(weight),
            }
        })
        .collect()
}

/// Run the full analysis with the given solver.
///
/// When no item maps to a known topic the report has no scores.
pub fn analyze(input: &AnalysisInput, solver: &dyn WeightSolver) -> Result<AnalysisReport, AppError> {
    let design = build_design(&input.topics, &input.items)?;
    let items_used = design.matrix.rows();

    if design.matrix.is_empty() {
        return Ok(AnalysisReport {
            scores: Vec::new(),
            items_used,
            items_skipped: design.skipped,
        });
    }

    let weights = solver.solve(&design.matrix, &design.outcomes)?;
    Ok(AnalysisReport {
        scores: score_topics(&input.topics, &weights),
        items_used,
        items_skipped: design.skipped,
    })
}

/// Topics sorted weakest first (ties keep topic order).
pub fn weakest_first(scores: &[TopicScore]) -> Vec<TopicScore> {
    let mut sorted = scores.to_vec();
    sorted.sort_by(|a, b| a.weight.partial_cmp(&b.weight).unwrap_or(std::cmp::Ordering::Equal));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::WeaknessSolver;

    fn topics(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn item(topic: &str, correct: bool) -> ExamItem {
        ExamItem {
            topic: topic.to_string(),
            correct,
        }
    }

    #[test]
    fn design_is_one_hot_and_skips_unknown_topics() {
        let t = topics(&["A", "B", "C"]);
        let design = build_design(&t, &[item("B", true), item("Z", true), item("A", false)]).unwrap();

        assert_eq!(design.skipped, 1);
        assert_eq!(design.matrix.rows(), 2);
        assert_eq!(design.matrix.row(0), &[0.0, 1.0, 0.0]);
        assert_eq!(design.matrix.row(1), &[1.0, 0.0, 0.0]);
        assert_eq!(design.outcomes, vec![1.0, 0.0]);
    }

    #[test]
    fn design_without_matching_items_is_empty() {
        let design = build_design(&topics(&["A", "B"]), &[item("Z", false)]).unwrap();
        assert!(design.matrix.is_empty());
        assert!(design.outcomes.is_empty());
        assert_eq!(design.skipped, 1);
    }

    #[test]
    fn scores_are_clamped_and_rounded() {
        assert_eq!(weight_to_score(-0.3), 0);
        assert_eq!(weight_to_score(0.666), 67);
        assert_eq!(weight_to_score(1.4), 100);
        assert_eq!(weight_to_score(f64::NAN), 0);
    }

    #[test]
    fn missing_weights_score_zero() {
        let scores = score_topics(&topics(&["A", "B"]), &[0.5]);
        assert_eq!(scores[0].score, 50);
        assert_eq!(scores[1].weight, 0.0);
        assert_eq!(scores[1].score, 0);
    }

    #[test]
    fn analysis_reports_per_topic_accuracy() {
        let input = AnalysisInput {
            topics: topics(&["A", "B", "C"]),
            items: vec![
                item("A", true),
                item("A", true),
                item("A", false),
                item("A", true),
                item("B", false),
                item("B", true),
            ],
        };
        let report = analyze(&input, &WeaknessSolver::default()).unwrap();

        assert_eq!(report.items_used, 6);
        assert_eq!(report.items_skipped, 0);
        let scores: Vec<u8> = report.scores.iter().map(|s| s.score).collect();
        assert_eq!(scores, vec![75, 50, 0]);

        let weakest = weakest_first(&report.scores);
        assert_eq!(weakest[0].topic, "C");
        assert_eq!(weakest[2].topic, "A");
    }

    #[test]
    fn analysis_without_known_topics_is_empty() {
        let input = AnalysisInput {
            topics: topics(&["A"]),
            items: vec![item("Q", true)],
        };
        let report = analyze(&input, &WeaknessSolver::default()).unwrap();
        assert!(report.scores.is_empty());
        assert_eq!(report.items_skipped, 1);
    }
}
