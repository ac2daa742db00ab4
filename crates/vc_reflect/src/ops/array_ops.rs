use crate::{Instance, Reflect};
use crate::ops::ReflectError;

// -----------------------------------------------------------------------------
// Array

/// A multi-dimensional array with a lower bound per dimension.
///
/// Indices are absolute: along a dimension with lower bound `b` and length
/// `n`, valid indices are `b..b + n`.
pub trait Array: Reflect {
    fn rank(&self) -> usize;

    fn length(&self, dimension: usize) -> usize;

    fn lower_bound(&self, dimension: usize) -> isize;

    fn get(&self, index: &[isize]) -> Option<&dyn Reflect>;

    /// Reallocates the array with the given shape; every cell becomes default.
    fn reshape(&mut self, lengths: &[usize], lower_bounds: &[isize]) -> Result<(), ReflectError>;

    /// Replaces the cell at `index`.
    fn set_at(&mut self, index: &[isize], value: Instance) -> Result<(), ReflectError>;
}

// -----------------------------------------------------------------------------
// NdArray

/// A rectangular array of rank `R`, stored row-major.
///
/// # Examples
///
/// ```
/// use vc_reflect::ops::NdArray;
///
/// // rows 1..3, columns 0..2
/// let grid = NdArray::from_shape_fn([2, 2], [1, 0], |[r, c]| r * 10 + c);
/// assert_eq!(grid.cell([1, 0]), Some(&10));
/// assert_eq!(grid.cell([2, 1]), Some(&21));
/// assert_eq!(grid.cell([0, 0]), None);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct NdArray<T, const R: usize> {
    lengths: [usize; R],
    lower_bounds: [isize; R],
    items: Vec<T>,
}

impl<T, const R: usize> Default for NdArray<T, R> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const R: usize> NdArray<T, R> {
    /// Creates an empty array: every length and bound is zero.
    #[inline]
    pub const fn new() -> Self {
        Self {
            lengths: [0; R],
            lower_bounds: [0; R],
            items: Vec::new(),
        }
    }

    /// Creates an array of the given shape, computing each cell from its index.
    ///
    /// # Panics
    ///
    /// Panics if the cell count overflows a `usize` or a dimension's last
    /// index overflows an `isize`.
    pub fn from_shape_fn(
        lengths: [usize; R],
        lower_bounds: [isize; R],
        mut f: impl FnMut([isize; R]) -> T,
    ) -> Self {
        let Some(total) = cell_count(&lengths, &lower_bounds) else {
            panic!("array shape {lengths:?} with bounds {lower_bounds:?} is out of range");
        };
        let mut items = Vec::with_capacity(total);
        let mut index = lower_bounds;
        for _ in 0..total {
            items.push(f(index));
            // Advance the innermost dimension first.
            for d in (0..R).rev() {
                index[d] += 1;
                if index[d] < lower_bounds[d] + lengths[d] as isize {
                    break;
                }
                index[d] = lower_bounds[d];
            }
        }
        Self {
            lengths,
            lower_bounds,
            items,
        }
    }

    /// Creates an array from row-major items; `None` if the count does not match.
    pub fn from_vec(lengths: [usize; R], lower_bounds: [isize; R], items: Vec<T>) -> Option<Self> {
        let total = cell_count(&lengths, &lower_bounds)?;
        (total == items.len()).then_some(Self {
            lengths,
            lower_bounds,
            items,
        })
    }

    #[inline]
    pub const fn lengths(&self) -> &[usize; R] {
        &self.lengths
    }

    #[inline]
    pub const fn lower_bounds(&self) -> &[isize; R] {
        &self.lower_bounds
    }

    /// The total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn cell(&self, index: [isize; R]) -> Option<&T> {
        self.items.get(self.offset(&index)?)
    }

    #[inline]
    pub fn cell_mut(&mut self, index: [isize; R]) -> Option<&mut T> {
        let offset = self.offset(&index)?;
        self.items.get_mut(offset)
    }

    /// Cells in row-major order.
    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub(crate) fn offset(&self, index: &[isize]) -> Option<usize> {
        if index.len() != R {
            return None;
        }
        let mut offset = 0_usize;
        for (d, &i) in index.iter().enumerate() {
            let relative = usize::try_from(i.checked_sub(self.lower_bounds[d])?).ok()?;
            if relative >= self.lengths[d] {
                return None;
            }
            offset = offset * self.lengths[d] + relative;
        }
        Some(offset)
    }

    pub(crate) fn reshape_with(
        &mut self,
        lengths: &[usize],
        lower_bounds: &[isize],
        f: impl FnMut() -> T,
    ) -> Result<(), ReflectError> {
        let (Ok(lengths), Ok(lower_bounds)) = (
            <[usize; R]>::try_from(lengths),
            <[isize; R]>::try_from(lower_bounds),
        ) else {
            return Err(ReflectError::InvalidShape {
                expected_rank: R,
                found_rank: lengths.len().max(lower_bounds.len()),
            });
        };
        let Some(total) = cell_count(&lengths, &lower_bounds) else {
            return Err(ReflectError::ShapeOverflow {
                lengths: lengths.to_vec(),
                lower_bounds: lower_bounds.to_vec(),
            });
        };
        self.items = core::iter::repeat_with(f).take(total).collect();
        self.lengths = lengths;
        self.lower_bounds = lower_bounds;
        Ok(())
    }

    pub(crate) fn items_mut(&mut self) -> &mut [T] {
        &mut self.items
    }
}

/// The number of cells of a shape; `None` if it or any dimension's end
/// index leaves the integer range.
fn cell_count(lengths: &[usize], lower_bounds: &[isize]) -> Option<usize> {
    for (bound, &length) in lower_bounds.iter().zip(lengths) {
        bound.checked_add_unsigned(length)?;
    }
    lengths
        .iter()
        .try_fold(1_usize, |total, &length| total.checked_mul(length))
}

// -----------------------------------------------------------------------------
// Tests
