//! Uniform random permutations of vertex indices.

use rand::{Rng, seq::SliceRandom};

/// A bijection on `{0, …, n−1}`, stored as the image of each index.
///
/// # Examples
/// ```
/// use ranking_core::Permutation;
///
/// let swap = Permutation::from_images(vec![1, 0]).expect("swap is a bijection");
/// assert_eq!(swap.get(0), Some(1));
/// assert!(Permutation::from_images(vec![0, 0]).is_none());
/// ```
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Permutation {
    images: Vec<usize>,
}

impl Permutation {
    /// Returns the identity permutation on `n` elements.
    #[must_use]
    pub fn identity(n: usize) -> Self {
        Self {
            images: (0..n).collect(),
        }
    }

    /// Wraps `images` when it is a bijection on `{0, …, images.len() − 1}`.
    #[must_use]
    pub fn from_images(images: Vec<usize>) -> Option<Self> {
        let mut seen = vec![false; images.len()];
        for &image in &images {
            let slot = seen.get_mut(image)?;
            if *slot {
                return None;
            }
            *slot = true;
        }
        Some(Self { images })
    }

    /// Number of elements permuted.
    #[must_use]
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Returns `true` for the permutation on zero elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Image of `index`, or `None` when out of range.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<usize> {
        self.images.get(index).copied()
    }

    /// Returns the images in index order.
    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.images
    }

    /// Returns `true` when every index maps to itself.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.images.iter().enumerate().all(|(index, &image)| index == image)
    }
}

/// Draws a uniformly random permutation of `{0, …, n−1}` from `rng`.
///
/// Uses a Fisher–Yates shuffle, so each of the `n!` orderings is equally
/// likely given a uniform source.
///
/// # Examples
/// ```
/// use rand::{SeedableRng, rngs::SmallRng};
/// use ranking_core::sample_permutation;
///
/// let mut rng = SmallRng::seed_from_u64(7);
/// let permutation = sample_permutation(5, &mut rng);
/// let mut sorted = permutation.as_slice().to_vec();
/// sorted.sort_unstable();
/// assert_eq!(sorted, [0, 1, 2, 3, 4]);
/// ```
pub fn sample_permutation<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Permutation {
    let mut images: Vec<usize> = (0..n).collect();
    images.shuffle(rng);
    Permutation { images }
}
