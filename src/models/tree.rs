//! CART regression tree, the base learner for both ensembles.
//!
//! Splits minimize the weighted sum of squared errors of the children.
//! Per-feature impurity decrease is accumulated during fitting and exposed
//! so the ensembles can report feature importances.

/// Stopping criteria for tree growth.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TreeParams {
    pub max_depth: usize,
    pub min_samples_split: usize,
}

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

/// A fitted regression tree.
#[derive(Debug, Clone)]
pub(crate) struct RegressionTree {
    root: Node,
    /// Unnormalized impurity decrease per feature.
    importances: Vec<f64>,
}

impl RegressionTree {
    /// Fit a tree on the rows selected by `indices`.
    pub fn fit(
        features: &[Vec<f64>],
        targets: &[f64],
        indices: &[usize],
        params: &TreeParams,
    ) -> Self {
        let n_features = features.first().map(|r| r.len()).unwrap_or(0);
        let mut importances = vec![0.0; n_features];
        let root = grow(features, targets, indices, params, 0, &mut importances);
        Self { root, importances }
    }

    pub fn predict(&self, row: &[f64]) -> f64 {
        let mut node = &self.root;
        loop {
            match node {
                Node::Leaf { value } => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if row[*feature] <= *threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }

    pub fn importances(&self) -> &[f64] {
        &self.importances
    }
}

fn grow(
    features: &[Vec<f64>],
    targets: &[f64],
    indices: &[usize],
    params: &TreeParams,
    depth: usize,
    importances: &mut [f64],
) -> Node {
    let leaf_value = node_mean(targets, indices);

    if depth >= params.max_depth || indices.len() < params.min_samples_split {
        return Node::Leaf { value: leaf_value };
    }

    match best_split(features, targets, indices) {
        Some(split) => {
            importances[split.feature] += split.gain;
            let left = grow(
                features,
                targets,
                &split.left_indices,
                params,
                depth + 1,
                importances,
            );
            let right = grow(
                features,
                targets,
                &split.right_indices,
                params,
                depth + 1,
                importances,
            );
            Node::Split {
                feature: split.feature,
                threshold: split.threshold,
                left: Box::new(left),
                right: Box::new(right),
            }
        }
        None => Node::Leaf { value: leaf_value },
    }
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    gain: f64,
    left_indices: Vec<usize>,
    right_indices: Vec<usize>,
}

/// Exhaustive search over midpoints between consecutive distinct feature
/// values, using prefix sums so each feature scan is a single pass.
fn best_split(features: &[Vec<f64>], targets: &[f64], indices: &[usize]) -> Option<BestSplit> {
    let n = indices.len();
    if n < 2 {
        return None;
    }
    let n_features = features[indices[0]].len();

    let total_sum: f64 = indices.iter().map(|&i| targets[i]).sum();
    let total_sq: f64 = indices.iter().map(|&i| targets[i].powi(2)).sum();
    let node_sse = total_sq - total_sum.powi(2) / n as f64;
    if node_sse <= 1e-12 {
        return None;
    }

    let mut best: Option<(usize, f64, f64, usize)> = None; // (feature, threshold, gain, split_pos)
    let mut best_sorted: Vec<usize> = Vec::new();

    let mut sorted = indices.to_vec();
    for feature in 0..n_features {
        sorted.sort_by(|&a, &b| {
            features[a][feature]
                .partial_cmp(&features[b][feature])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut left_sum = 0.0;
        let mut left_sq = 0.0;
        for pos in 0..n - 1 {
            let i = sorted[pos];
            left_sum += targets[i];
            left_sq += targets[i].powi(2);

            let here = features[i][feature];
            let next = features[sorted[pos + 1]][feature];
            if next <= here {
                continue; // no distinct boundary
            }

            let n_left = (pos + 1) as f64;
            let n_right = (n - pos - 1) as f64;
            let right_sum = total_sum - left_sum;
            let right_sq = total_sq - left_sq;
            let sse = (left_sq - left_sum.powi(2) / n_left)
                + (right_sq - right_sum.powi(2) / n_right);
            let gain = node_sse - sse;

            if gain > 1e-12 && best.map(|(_, _, g, _)| gain > g).unwrap_or(true) {
                best = Some((feature, (here + next) / 2.0, gain, pos + 1));
                best_sorted = sorted.clone();
            }
        }
    }

    best.map(|(feature, threshold, gain, split_pos)| BestSplit {
        feature,
        threshold,
        gain,
        left_indices: best_sorted[..split_pos].to_vec(),
        right_indices: best_sorted[split_pos..].to_vec(),
    })
}

fn node_mean(targets: &[f64], indices: &[usize]) -> f64 {
    if indices.is_empty() {
        return 0.0;
    }
    indices.iter().map(|&i| targets[i]).sum::<f64>() / indices.len() as f64
}
