use serde::Serialize;

/// Assignment of points to classes.
///
/// Points are identified by their position in the point set, so two points
/// with equal coordinates still get one entry each. The class of a point is
/// the position of its kernel in the kernel list the classification was
/// computed from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    classes: usize,
    class_of: Vec<usize>,
}

impl Classification {
    /// Class indices are not validated here; the clustering steps reject a
    /// classification with a class outside `0..classes`.
    pub fn new(class_of: Vec<usize>, classes: usize) -> Self {
        Self { classes, class_of }
    }

    /// Number of classified points
    pub fn len(&self) -> usize {
        self.class_of.len()
    }

    pub fn is_empty(&self) -> bool {
        self.class_of.is_empty()
    }

    /// Number of classes, i.e. the number of kernels this classification
    /// was computed with.
    pub fn num_classes(&self) -> usize {
        self.classes
    }

    pub fn class_of(&self, point: usize) -> usize {
        self.class_of[point]
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.class_of
    }

    /// Indices of the points of class `class`, in point order.
    pub fn members(&self, class: usize) -> impl Iterator<Item = usize> + '_ {
        self.class_of
            .iter()
            .enumerate()
            .filter(move |&(_, &c)| c == class)
            .map(|(i, _)| i)
    }

    /// Members of every class, bucketed in a single pass over the points.
    /// Each bucket lists its points in point order.
    pub fn buckets(&self) -> Vec<Vec<usize>> {
        let mut buckets = vec![Vec::new(); self.classes];
        for (i, &c) in self.class_of.iter().enumerate() {
            buckets[c].push(i);
        }
        buckets
    }

    pub fn class_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.classes];
        for &c in &self.class_of {
            sizes[c] += 1;
        }
        sizes
    }

    pub fn snapshot(&self, kernels: &[usize]) -> Snapshot {
        Snapshot {
            kernels: kernels.to_vec(),
            class_sizes: self.class_sizes(),
        }
    }
}

/// What the run looks like between two phases: the kernels and how many
/// points each of them attracts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub kernels: Vec<usize>,
    pub class_sizes: Vec<usize>,
}
