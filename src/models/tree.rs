//! Regression tree shared by the boosted and bagged ensembles.
//!
//! Splits greedily minimize the sum of squared errors, scanning every feature
//! and every midpoint between adjacent distinct values. Growth stops at the
//! configured depth, when a node drops below the leaf minimum, or when no
//! split reduces the error.

#[derive(Debug, Clone, Copy)]
pub(crate) struct TreeConfig {
    pub max_depth: usize,
    pub min_samples_leaf: usize,
}

#[derive(Debug, Clone)]
enum Node {
    Leaf(f64),
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone)]
pub(crate) struct RegressionTree {
    nodes: Vec<Node>,
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    score: f64,
}

impl RegressionTree {
    /// Fit a tree on the rows selected by `indices`.
    pub fn fit(x: &[Vec<f64>], y: &[f64], indices: &[usize], config: TreeConfig) -> Self {
        let mut tree = Self { nodes: Vec::new() };
        let mut owned = indices.to_vec();
        tree.grow(x, y, &mut owned, 0, config);
        tree
    }

    /// Grow a subtree over `indices`, returning its node id.
    fn grow(
        &mut self,
        x: &[Vec<f64>],
        y: &[f64],
        indices: &mut [usize],
        depth: usize,
        config: TreeConfig,
    ) -> usize {
        let mean = node_mean(y, indices);

        if depth >= config.max_depth || indices.len() < 2 * config.min_samples_leaf {
            return self.push(Node::Leaf(mean));
        }

        let Some(split) = best_split(x, y, indices, config.min_samples_leaf) else {
            return self.push(Node::Leaf(mean));
        };

        // Partition in place: rows at or below the threshold go left.
        let mid = partition(x, indices, split.feature, split.threshold);
        if mid == 0 || mid == indices.len() {
            return self.push(Node::Leaf(mean));
        }

        let (left_idx, right_idx) = indices.split_at_mut(mid);
        let left = self.grow(x, y, left_idx, depth + 1, config);
        let right = self.grow(x, y, right_idx, depth + 1, config);

        self.push(Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        })
    }

    fn push(&mut self, node: Node) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    /// Predict a single feature row.
    pub fn predict_row(&self, row: &[f64]) -> f64 {
        let mut node = self.nodes.len() - 1; // root is pushed last
        loop {
            match &self.nodes[node] {
                Node::Leaf(value) => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }
}

fn node_mean(y: &[f64], indices: &[usize]) -> f64 {
    if indices.is_empty() {
        return 0.0;
    }
    indices.iter().map(|&i| y[i]).sum::<f64>() / indices.len() as f64
}

/// Move rows with `x[feature] <= threshold` to the front, returning the split
/// point.
fn partition(x: &[Vec<f64>], indices: &mut [usize], feature: usize, threshold: f64) -> usize {
    let mut mid = 0;
    for i in 0..indices.len() {
        if x[indices[i]][feature] <= threshold {
            indices.swap(i, mid);
            mid += 1;
        }
    }
    mid
}

/// Best SSE-reducing split over all features, if any improves on the parent.
fn best_split(
    x: &[Vec<f64>],
    y: &[f64],
    indices: &[usize],
    min_samples_leaf: usize,
) -> Option<BestSplit> {
    let n = indices.len();
    let total_sum: f64 = indices.iter().map(|&i| y[i]).sum();
    let total_sq: f64 = indices.iter().map(|&i| y[i] * y[i]).sum();
    let parent_sse = total_sq - total_sum * total_sum / n as f64;

    let width = x[indices[0]].len();
    let mut best: Option<BestSplit> = None;

    let mut sorted: Vec<(f64, f64)> = Vec::with_capacity(n);
    for feature in 0..width {
        sorted.clear();
        sorted.extend(indices.iter().map(|&i| (x[i][feature], y[i])));
        sorted.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

        let mut left_sum = 0.0;
        let mut left_sq = 0.0;
        for pos in 0..n - 1 {
            let (value, target) = sorted[pos];
            left_sum += target;
            left_sq += target * target;

            let next_value = sorted[pos + 1].0;
            if next_value <= value {
                continue; // No threshold separates equal values.
            }

            let left_n = pos + 1;
            let right_n = n - left_n;
            if left_n < min_samples_leaf || right_n < min_samples_leaf {
                continue;
            }

            let right_sum = total_sum - left_sum;
            let right_sq = total_sq - left_sq;
            let sse = (left_sq - left_sum * left_sum / left_n as f64)
                + (right_sq - right_sum * right_sum / right_n as f64);
            let score = parent_sse - sse;

            if score > 1e-12 && best.as_ref().map_or(true, |b| score > b.score) {
                best = Some(BestSplit {
                    feature,
                    threshold: (value + next_value) / 2.0,
                    score,
                });
            }
        }
    }

    best
}
