//! Logistic regression sentiment model
//!
//! Hashed bag-of-words features (lowercased alphanumeric tokens, 2^16
//! buckets) with a binary logistic regression trained by stochastic
//! gradient descent over the corpus at startup. Training is deterministic:
//! fixed epoch count, fixed learning rate, corpus order.
//!
//! The reported score is the signed margin `w·x + b`; the label is its
//! sign. Magnitude grows with confidence but is not a probability.

use super::{Dataset, Prediction, ScoreError, Scorer};
use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use tracing::info;

/// Feature space size
const NUM_BUCKETS: usize = 1 << 16;

/// SGD passes over the corpus
const EPOCHS: usize = 30;

/// SGD step size
const LEARNING_RATE: f64 = 0.1;

/// Trained sentiment classifier
pub struct LogisticScorer {
    weights: Vec<f64>,
    bias: f64,
}

impl LogisticScorer {
    /// Train a model on the given corpus
    ///
    /// Deterministic for a fixed corpus; training twice yields an identical
    /// model.
    pub fn train(dataset: &Dataset) -> Self {
        let features: Vec<HashMap<usize, f64>> = dataset
            .examples
            .iter()
            .map(|example| featurize(&example.text))
            .collect();

        let mut weights = vec![0.0f64; NUM_BUCKETS];
        let mut bias = 0.0f64;

        for _ in 0..EPOCHS {
            for (example, feats) in dataset.examples.iter().zip(&features) {
                let margin = dot(&weights, bias, feats);
                let predicted = sigmoid(margin);
                let target = if example.label { 1.0 } else { 0.0 };
                let gradient = predicted - target;
                for (&bucket, &count) in feats {
                    weights[bucket] -= LEARNING_RATE * gradient * count;
                }
                bias -= LEARNING_RATE * gradient;
            }
        }

        let model = Self { weights, bias };

        let correct = dataset
            .examples
            .iter()
            .filter(|example| (model.margin(&example.text) > 0.0) == example.label)
            .count();
        info!(
            examples = dataset.len(),
            epochs = EPOCHS,
            training_accuracy = correct as f64 / dataset.len() as f64,
            "Sentiment model trained"
        );

        model
    }

    /// Signed margin for `text`
    fn margin(&self, text: &str) -> f64 {
        dot(&self.weights, self.bias, &featurize(text))
    }
}

impl Scorer for LogisticScorer {
    fn name(&self) -> &'static str {
        "logistic"
    }

    fn score(&self, text: &str) -> Result<Prediction, ScoreError> {
        let score = self.margin(text);
        Ok(Prediction {
            label: score > 0.0,
            score,
        })
    }
}

/// Token counts hashed into the fixed feature space
fn featurize(text: &str) -> HashMap<usize, f64> {
    let mut counts: HashMap<usize, f64> = HashMap::new();
    let lowered = text.to_lowercase();
    for token in lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
    {
        let mut hasher = DefaultHasher::new();
        token.hash(&mut hasher);
        let bucket = (hasher.finish() as usize) % NUM_BUCKETS;
        *counts.entry(bucket).or_insert(0.0) += 1.0;
    }
    counts
}

fn dot(weights: &[f64], bias: f64, features: &HashMap<usize, f64>) -> f64 {
    bias + features
        .iter()
        .map(|(&bucket, &count)| weights[bucket] * count)
        .sum::<f64>()
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_corpus() -> Dataset {
        Dataset::from_csv(concat!(
            "1,1,great video loved every minute\n",
            "2,1,excellent content really helpful\n",
            "3,1,amazing work keep it up\n",
            "4,1,this was wonderful and fun\n",
            "5,0,terrible video waste of time\n",
            "6,0,awful content really boring\n",
            "7,0,horrible work please stop\n",
            "8,0,this was dreadful and dull\n",
        ))
        .unwrap()
    }

    #[test]
    fn separates_training_vocabulary() {
        let model = LogisticScorer::train(&tiny_corpus());

        let positive = model.score("great video really excellent").unwrap();
        let negative = model.score("terrible awful waste").unwrap();

        assert!(positive.score > 0.0, "got {}", positive.score);
        assert!(positive.label);
        assert!(negative.score < 0.0, "got {}", negative.score);
        assert!(!negative.label);
    }

    #[test]
    fn label_matches_score_sign() {
        let model = LogisticScorer::train(&tiny_corpus());
        for text in ["loved it", "boring", "great", "horrible", ""] {
            let prediction = model.score(text).unwrap();
            assert_eq!(prediction.label, prediction.score > 0.0);
        }
    }

    #[test]
    fn training_is_deterministic() {
        let corpus = tiny_corpus();
        let first = LogisticScorer::train(&corpus);
        let second = LogisticScorer::train(&corpus);

        for text in ["great video", "awful content", "meh"] {
            assert_eq!(
                first.score(text).unwrap().score,
                second.score(text).unwrap().score
            );
        }
    }

    #[test]
    fn embedded_corpus_model_scores_obvious_cases() {
        let model = LogisticScorer::train(&Dataset::embedded().unwrap());

        assert!(model.score("absolutely loved this video").unwrap().label);
        assert!(!model.score("terrible waste of time").unwrap().label);
    }

    #[test]
    fn tokenizer_ignores_case_and_punctuation() {
        let a = featurize("Great, video!");
        let b = featurize("great video");
        assert_eq!(a, b);
    }
}
