//! Small dense linear algebra on row-major `f64` slices.
//!
//! Only what the cube method needs: the rank of a tall matrix and one vector of the
//! null space of a wide one. Both use Gauss-Jordan elimination with partial pivoting
//! after scaling, so `tol` is relative to the largest entry of each scaled line.

/// Default pivot tolerance after scaling.
pub(crate) const PIVOT_TOLERANCE: f64 = 1e-9;

/// Reduces `a` (rows x cols) in place to reduced row echelon form.
/// Returns the pivot column of each pivot row, in row order.
fn reduce(a: &mut [f64], rows: usize, cols: usize, tol: f64) -> Vec<usize> {
    debug_assert_eq!(a.len(), rows * cols);
    let mut pivots = Vec::with_capacity(rows.min(cols));
    let mut r = 0;
    for c in 0..cols {
        if r == rows {
            break;
        }
        let mut best = r;
        let mut best_abs = a[r * cols + c].abs();
        for i in (r + 1)..rows {
            let v = a[i * cols + c].abs();
            if v > best_abs {
                best = i;
                best_abs = v;
            }
        }
        if best_abs <= tol {
            continue;
        }
        if best != r {
            for j in 0..cols {
                a.swap(best * cols + j, r * cols + j);
            }
        }
        let piv = a[r * cols + c];
        for j in 0..cols {
            a[r * cols + j] /= piv;
        }
        for i in 0..rows {
            if i == r {
                continue;
            }
            let f = a[i * cols + c];
            if f == 0.0 {
                continue;
            }
            for j in 0..cols {
                a[i * cols + j] -= f * a[r * cols + j];
            }
        }
        pivots.push(c);
        r += 1;
    }
    pivots
}

/// Numerical rank of a row-major `rows x cols` matrix.
///
/// Each column is scaled to unit max-norm first; all-zero columns count as dependent.
pub(crate) fn rank(data: &[f64], rows: usize, cols: usize, tol: f64) -> usize {
    let mut a = data.to_vec();
    for c in 0..cols {
        let max = (0..rows)
            .map(|i| a[i * cols + c].abs())
            .fold(0.0f64, f64::max);
        if max > 0.0 {
            for i in 0..rows {
                a[i * cols + c] /= max;
            }
        }
    }
    reduce(&mut a, rows, cols, tol).len()
}

/// A non-zero vector `u` with `a * u = 0`, or `None` when the null space is trivial.
///
/// `a` is consumed as scratch space. Rows are scaled to unit max-norm, which leaves the
/// null space unchanged. The returned vector has a `1.0` at the first free column.
pub(crate) fn null_vector(a: &mut [f64], rows: usize, cols: usize, tol: f64) -> Option<Vec<f64>> {
    if cols == 0 {
        return None;
    }
    for i in 0..rows {
        let row = &mut a[i * cols..(i + 1) * cols];
        let max = row.iter().map(|v| v.abs()).fold(0.0f64, f64::max);
        if max > 0.0 {
            for v in row.iter_mut() {
                *v /= max;
            }
        }
    }
    let pivots = reduce(a, rows, cols, tol);
    let free = (0..cols).find(|c| !pivots.contains(c))?;
    let mut u = vec![0.0; cols];
    u[free] = 1.0;
    for (row, &pc) in pivots.iter().enumerate() {
        u[pc] = -a[row * cols + free];
    }
    Some(u)
}
