//! Synthetic exam generation.
//!
//! Each topic gets a hidden mastery level drawn from `Beta(alpha, beta)`;
//! items are assigned to topics round-robin and answered correctly with
//! probability equal to the topic's mastery. The output is deterministic for
//! a given seed, which makes it usable as a fixture and as a demo input.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Bernoulli, Beta, Distribution};

use crate::domain::{AnalysisInput, ExamItem, SampleConfig};
use crate::error::{AppError, EXIT_COMPUTE, EXIT_INPUT};

/// Generated exam plus the mastery levels it was drawn from.
#[derive(Debug, Clone)]
pub struct SampleExam {
    pub input: AnalysisInput,
    pub mastery: Vec<f64>,
}

pub fn topic_name(i: usize) -> String {
    format!("Topic {:02}", i + 1)
}

pub fn generate_exam(config: &SampleConfig) -> Result<SampleExam, AppError> {
    if config.topic_count == 0 {
        return Err(AppError::new(EXIT_INPUT, "Topic count must be > 0."));
    }
    if config.item_count == 0 {
        return Err(AppError::new(EXIT_INPUT, "Item count must be > 0."));
    }
    if !(config.alpha.is_finite() && config.beta.is_finite() && config.alpha > 0.0 && config.beta > 0.0) {
        return Err(AppError::new(EXIT_INPUT, "Beta shape parameters must be finite and > 0."));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mastery_dist = Beta::new(config.alpha, config.beta)
        .map_err(|e| AppError::new(EXIT_COMPUTE, format!("Mastery distribution error: {e}")))?;

    let topics: Vec<String> = (0..config.topic_count).map(topic_name).collect();
    let mastery: Vec<f64> = (0..config.topic_count)
        .map(|_| mastery_dist.sample(&mut rng))
        .collect();

    let answer_dists = mastery
        .iter()
        .map(|&p| Bernoulli::new(p.clamp(0.0, 1.0)))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| AppError::new(EXIT_COMPUTE, format!("Answer distribution error: {e}")))?;

    let items = (0..config.item_count)
        .map(|i| {
            let topic = i % config.topic_count;
            ExamItem {
                topic: topics[topic].clone(),
                correct: answer_dists[topic].sample(&mut rng),
            }
        })
        .collect();

    Ok(SampleExam {
        input: AnalysisInput { topics, items },
        mastery,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(seed: u64) -> SampleConfig {
        SampleConfig {
            topic_count: 4,
            item_count: 40,
            seed,
            alpha: 2.0,
            beta: 2.0,
        }
    }

    #[test]
    fn same_seed_gives_same_exam() {
        let a = generate_exam(&config(7)).unwrap();
        let b = generate_exam(&config(7)).unwrap();
        assert_eq!(a.input, b.input);
        assert_eq!(a.mastery, b.mastery);
    }

    #[test]
    fn items_cycle_through_topics() {
        let exam = generate_exam(&config(1)).unwrap();
        assert_eq!(exam.input.topics.len(), 4);
        assert_eq!(exam.input.items.len(), 40);
        assert_eq!(exam.input.items[0].topic, "Topic 01");
        assert_eq!(exam.input.items[5].topic, "Topic 02");
        assert!(exam.mastery.iter().all(|m| (0.0..=1.0).contains(m)));
    }

    #[test]
    fn invalid_settings_are_rejected() {
        let mut c = config(1);
        c.topic_count = 0;
        assert!(generate_exam(&c).is_err());

        let mut c = config(1);
        c.alpha = -1.0;
        assert_eq!(generate_exam(&c).unwrap_err().exit_code(), EXIT_INPUT);
    }
}
