//! Cell geometry of standard AprilTag layouts.
//!
//! Kept free of crate dependencies: the build script compiles this file too.

/// Cell of the standard layout at `(x, y)`: `b` on the second ring, `w` on
/// the third, `d` (data) everywhere else.
pub(crate) fn standard_cell(width: usize, x: usize, y: usize) -> char {
    let ring = x.min(y).min(width - 1 - x).min(width - 1 - y);
    match ring {
        1 => 'b',
        2 => 'w',
        _ => 'd',
    }
}

pub(crate) fn standard_rows(width: usize) -> Vec<String> {
    (0..width)
        .map(|y| (0..width).map(|x| standard_cell(width, x, y)).collect())
        .collect()
}

/// AprilTag bit order: the top quadrant is scanned row by row, then the
/// same scan is repeated for each 90° clockwise rotation, and the centre
/// cell of odd-sized tags comes last.
pub(crate) fn bit_order(width: usize, is_data: impl Fn(usize, usize) -> bool) -> Vec<(usize, usize)> {
    let n = width;
    let rotate = |x: usize, y: usize, quarter_turns: usize| {
        let (mut x, mut y) = (x, y);
        for _ in 0..quarter_turns {
            (x, y) = (n - 1 - y, x);
        }
        (x, y)
    };

    let mut out = Vec::new();
    for quarter_turns in 0..4 {
        for y in 0..n / 2 {
            for x in y..(n - 1 - y) {
                if is_data(x, y) {
                    out.push(rotate(x, y, quarter_turns));
                }
            }
        }
    }
    if n % 2 == 1 && is_data(n / 2, n / 2) {
        out.push((n / 2, n / 2));
    }
    out
}
