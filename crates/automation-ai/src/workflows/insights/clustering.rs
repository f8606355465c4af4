//! Similarity grouping over assessment factor vectors.
//!
//! Columns are standardized before clustering so that no single factor dominates the
//! distance. The default clusterer is a deterministic k-means: centroids start at evenly
//! spaced samples and distance ties go to the lowest cluster index, so the same input
//! always yields the same labels.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::workflows::assessments::Assessment;

pub const MIN_SIMILARITY_SAMPLES: usize = 3;
pub const KMEANS_MAX_ITERATIONS: usize = 20;

pub type FactorVector = [f64; 6];

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClusteringError {
    #[error("need at least {required} samples, got {actual}")]
    TooFewSamples { required: usize, actual: usize },
    #[error("cannot form {clusters} clusters from {samples} samples")]
    InvalidClusterCount { clusters: usize, samples: usize },
    #[error("clustering failed: {0}")]
    Failed(String),
}

/// Assigns every row of the matrix a label in `[0, k)`.
pub trait Clusterer: Send + Sync {
    fn cluster(&self, samples: &[FactorVector], k: usize) -> Result<Vec<usize>, ClusteringError>;
}

#[derive(Debug, Clone, Copy)]
pub struct KMeansClusterer {
    max_iterations: usize,
}

impl Default for KMeansClusterer {
    fn default() -> Self {
        Self {
            max_iterations: KMEANS_MAX_ITERATIONS,
        }
    }
}

impl KMeansClusterer {
    pub fn new(max_iterations: usize) -> Self {
        Self {
            max_iterations: max_iterations.max(1),
        }
    }
}

fn squared_distance(left: &FactorVector, right: &FactorVector) -> f64 {
    left.iter()
        .zip(right.iter())
        .map(|(a, b)| (a - b).powi(2))
        .sum()
}

fn nearest(sample: &FactorVector, centroids: &[FactorVector]) -> usize {
    let mut best = 0;
    let mut best_distance = f64::INFINITY;
    for (index, centroid) in centroids.iter().enumerate() {
        let distance = squared_distance(sample, centroid);
        if distance < best_distance {
            best_distance = distance;
            best = index;
        }
    }
    best
}

impl Clusterer for KMeansClusterer {
    fn cluster(&self, samples: &[FactorVector], k: usize) -> Result<Vec<usize>, ClusteringError> {
        let n = samples.len();
        if k == 0 || k > n {
            return Err(ClusteringError::InvalidClusterCount {
                clusters: k,
                samples: n,
            });
        }
        if samples.iter().flatten().any(|value| !value.is_finite()) {
            return Err(ClusteringError::Failed("non-finite feature value".to_string()));
        }

        let mut centroids: Vec<FactorVector> = (0..k).map(|i| samples[i * n / k]).collect();
        let mut labels: Vec<usize> = samples
            .iter()
            .map(|sample| nearest(sample, &centroids))
            .collect();

        for _ in 0..self.max_iterations {
            let mut sums = vec![[0.0; 6]; k];
            let mut counts = vec![0usize; k];
            for (sample, label) in samples.iter().zip(&labels) {
                counts[*label] += 1;
                for (total, value) in sums[*label].iter_mut().zip(sample) {
                    *total += value;
                }
            }
            // An emptied cluster keeps its previous centroid.
            for (cluster, centroid) in centroids.iter_mut().enumerate() {
                if counts[cluster] > 0 {
                    let size = counts[cluster] as f64;
                    for (slot, total) in centroid.iter_mut().zip(&sums[cluster]) {
                        *slot = total / size;
                    }
                }
            }

            let next: Vec<usize> = samples
                .iter()
                .map(|sample| nearest(sample, &centroids))
                .collect();
            if next == labels {
                break;
            }
            labels = next;
        }

        Ok(labels)
    }
}

/// Zero mean and unit variance per column; constant columns become 0.
pub fn standardize(samples: &[FactorVector]) -> Vec<FactorVector> {
    if samples.is_empty() {
        return Vec::new();
    }
    let count = samples.len() as f64;
    let mut mean = [0.0; 6];
    for sample in samples {
        for (slot, value) in mean.iter_mut().zip(sample) {
            *slot += value / count;
        }
    }
    let mut std_dev = [0.0; 6];
    for sample in samples {
        for ((slot, value), centre) in std_dev.iter_mut().zip(sample).zip(&mean) {
            *slot += (value - centre).powi(2) / count;
        }
    }
    for slot in std_dev.iter_mut() {
        *slot = slot.sqrt();
    }

    samples
        .iter()
        .map(|sample| {
            let mut scaled = [0.0; 6];
            for (column, slot) in scaled.iter_mut().enumerate() {
                if std_dev[column] > f64::EPSILON {
                    *slot = (sample[column] - mean[column]) / std_dev[column];
                }
            }
            scaled
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterMember {
    pub process_name: String,
    pub scores: [u8; 6],
    pub total_score: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarityInsight {
    pub cluster_id: usize,
    pub processes: Vec<String>,
    pub average_score: f64,
    pub insight: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarityOutcome {
    pub processes_analyzed: Vec<String>,
    pub cluster_groups: BTreeMap<usize, Vec<ClusterMember>>,
    pub insights: Vec<SimilarityInsight>,
}

/// Group assessments with similar factor profiles.
pub fn analyze_similarity(
    assessments: &[Assessment],
    max_clusters: usize,
    clusterer: &dyn Clusterer,
) -> Result<SimilarityOutcome, ClusteringError> {
    if assessments.len() < MIN_SIMILARITY_SAMPLES {
        return Err(ClusteringError::TooFewSamples {
            required: MIN_SIMILARITY_SAMPLES,
            actual: assessments.len(),
        });
    }

    let raw: Vec<FactorVector> = assessments
        .iter()
        .map(|assessment| assessment.factors().values().map(f64::from))
        .collect();
    let k = max_clusters.max(1).min(assessments.len() / 2);
    let labels = clusterer.cluster(&standardize(&raw), k)?;
    if labels.len() != assessments.len() {
        return Err(ClusteringError::Failed(format!(
            "expected {} labels, got {}",
            assessments.len(),
            labels.len()
        )));
    }

    let mut cluster_groups: BTreeMap<usize, Vec<ClusterMember>> = BTreeMap::new();
    for (assessment, label) in assessments.iter().zip(labels) {
        cluster_groups.entry(label).or_default().push(ClusterMember {
            process_name: assessment.process_name.clone(),
            scores: assessment.factors().values(),
            total_score: assessment.total_score(),
        });
    }

    let insights = cluster_groups
        .iter()
        .filter(|(_, members)| members.len() > 1)
        .map(|(cluster_id, members)| {
            let total: f64 = members.iter().map(|member| f64::from(member.total_score)).sum();
            let average = total / members.len() as f64;
            SimilarityInsight {
                cluster_id: *cluster_id,
                processes: members.iter().map(|member| member.process_name.clone()).collect(),
                average_score: (average * 10.0).round() / 10.0,
                insight: format!(
                    "These {} processes have similar automation characteristics",
                    members.len()
                ),
            }
        })
        .collect();

    Ok(SimilarityOutcome {
        processes_analyzed: assessments
            .iter()
            .map(|assessment| assessment.process_name.clone())
            .collect(),
        cluster_groups,
        insights,
    })
}
