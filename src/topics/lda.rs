//! Latent Dirichlet Allocation fitted with a collapsed Gibbs sampler.

use super::vectorizer::{Corpus, CountVectorizer};
use super::TopicExtractor;
use crate::config::TopicSettings;
use crate::error::{Error, Result};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, instrument};

/// A fitted model: topic-word and document-topic weights.
#[derive(Debug, Clone)]
pub struct LdaModel {
    /// `topic_word[k][w]`, smoothed word weights per topic.
    pub topic_word: Vec<Vec<f64>>,
    /// `doc_topic[d][k]`, smoothed topic weights per document.
    pub doc_topic: Vec<Vec<f64>>,
}

impl LdaModel {
    /// Fit `num_topics` topics to an encoded corpus.
    pub fn fit(corpus: &Corpus, num_topics: usize, iterations: usize, seed: u64) -> Self {
        let k_count = num_topics.max(1);
        let v_count = corpus.vocabulary_size();
        let alpha = 1.0 / k_count as f64;
        let beta = 1.0 / k_count as f64;
        let v_beta = v_count as f64 * beta;

        let mut rng = StdRng::seed_from_u64(seed);
        let mut n_dk = vec![vec![0usize; k_count]; corpus.documents.len()];
        let mut n_kw = vec![vec![0usize; v_count]; k_count];
        let mut n_k = vec![0usize; k_count];

        let mut assignments: Vec<Vec<usize>> = corpus
            .documents
            .iter()
            .enumerate()
            .map(|(d, doc)| {
                doc.iter()
                    .map(|&w| {
                        let k = rng.gen_range(0..k_count);
                        n_dk[d][k] += 1;
                        n_kw[k][w] += 1;
                        n_k[k] += 1;
                        k
                    })
                    .collect()
            })
            .collect();

        let mut weights = vec![0.0f64; k_count];
        for _ in 0..iterations {
            for (d, doc) in corpus.documents.iter().enumerate() {
                for (i, &w) in doc.iter().enumerate() {
                    let old = assignments[d][i];
                    n_dk[d][old] -= 1;
                    n_kw[old][w] -= 1;
                    n_k[old] -= 1;

                    let mut total = 0.0;
                    for k in 0..k_count {
                        total += (n_dk[d][k] as f64 + alpha) * (n_kw[k][w] as f64 + beta)
                            / (n_k[k] as f64 + v_beta);
                        weights[k] = total;
                    }

                    let target = rng.gen::<f64>() * total;
                    let new = weights
                        .iter()
                        .position(|&cumulative| target < cumulative)
                        .unwrap_or(k_count - 1);

                    assignments[d][i] = new;
                    n_dk[d][new] += 1;
                    n_kw[new][w] += 1;
                    n_k[new] += 1;
                }
            }
        }

        let topic_word = (0..k_count)
            .map(|k| {
                (0..v_count)
                    .map(|w| (n_kw[k][w] as f64 + beta) / (n_k[k] as f64 + v_beta))
                    .collect()
            })
            .collect();

        let doc_topic = corpus
            .documents
            .iter()
            .enumerate()
            .map(|(d, doc)| {
                let denom = doc.len() as f64 + k_count as f64 * alpha;
                (0..k_count)
                    .map(|k| (n_dk[d][k] as f64 + alpha) / denom)
                    .collect()
            })
            .collect();

        Self {
            topic_word,
            doc_topic,
        }
    }

    /// Index of the heaviest topic for a document. Ties go to the lower index.
    pub fn dominant_topic(&self, doc: usize) -> usize {
        argmax(&self.doc_topic[doc])
    }

    /// Word ids of a topic's `top_k` heaviest words, heaviest first.
    pub fn top_words(&self, topic: usize, top_k: usize) -> Vec<usize> {
        let weights = &self.topic_word[topic];
        let mut ids: Vec<usize> = (0..weights.len()).collect();
        ids.sort_by(|&a, &b| {
            weights[b]
                .partial_cmp(&weights[a])
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.cmp(&b))
        });
        ids.truncate(top_k);
        ids
    }
}

fn argmax(values: &[f64]) -> usize {
    values
        .iter()
        .enumerate()
        .fold((0, f64::MIN), |best, (i, &v)| if v > best.1 { (i, v) } else { best })
        .0
}

/// Topic extractor backed by [`LdaModel`].
///
/// Each text is labelled with the top words of its dominant topic, so the output is
/// aligned with the input whatever the topic count.
#[derive(Debug, Clone)]
pub struct LdaTopicExtractor {
    vectorizer: CountVectorizer,
    num_topics: Option<usize>,
    max_topics: usize,
    iterations: usize,
    seed: u64,
}

impl LdaTopicExtractor {
    pub fn new(settings: &TopicSettings) -> Self {
        Self {
            vectorizer: CountVectorizer::new(&settings.stop_words),
            num_topics: settings.num_topics,
            max_topics: settings.max_topics.max(1),
            iterations: settings.iterations,
            seed: settings.seed,
        }
    }

    /// Topic count for a batch: the configured value, else one per text up to the cap.
    pub fn topic_count(&self, batch_size: usize) -> usize {
        self.num_topics
            .unwrap_or_else(|| batch_size.min(self.max_topics))
            .max(1)
    }

    /// Synchronous extraction; the async trait method runs this on a blocking thread.
    pub fn extract(&self, texts: &[String], top_k: usize) -> Vec<Vec<String>> {
        if texts.is_empty() {
            return Vec::new();
        }

        let corpus = self.vectorizer.fit_transform(texts);
        if corpus.vocabulary_size() == 0 {
            return vec![Vec::new(); texts.len()];
        }

        let num_topics = self.topic_count(texts.len());
        debug!(
            texts = texts.len(),
            vocabulary = corpus.vocabulary_size(),
            num_topics,
            "Fitting LDA"
        );
        let model = LdaModel::fit(&corpus, num_topics, self.iterations, self.seed);

        corpus
            .documents
            .iter()
            .enumerate()
            .map(|(d, doc)| {
                if doc.is_empty() {
                    return Vec::new();
                }
                model
                    .top_words(model.dominant_topic(d), top_k)
                    .into_iter()
                    .map(|w| corpus.vocabulary[w].clone())
                    .collect()
            })
            .collect()
    }
}

#[async_trait]
impl TopicExtractor for LdaTopicExtractor {
    #[instrument(skip(self, texts), fields(count = texts.len()))]
    async fn get_topics(&self, texts: &[String], top_k: usize) -> Result<Vec<Vec<String>>> {
        let extractor = self.clone();
        let texts = texts.to_vec();

        tokio::task::spawn_blocking(move || extractor.extract(&texts, top_k))
            .await
            .map_err(|e| Error::TopicExtraction(format!("LDA worker failed: {}", e)))
    }
}
