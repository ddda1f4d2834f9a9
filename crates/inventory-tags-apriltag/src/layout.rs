//! Square cell layouts of AprilTag families.

use crate::{geometry, TagFamilyError};

/// Content of one layout cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellKind {
    /// Carries one code bit.
    Data,
    /// Always black.
    Black,
    /// Always white.
    White,
}

impl CellKind {
    fn from_char(c: char) -> Option<Self> {
        match c {
            'd' => Some(Self::Data),
            'b' => Some(Self::Black),
            'w' => Some(Self::White),
            _ => None,
        }
    }
}

/// Cell layout of a tag family plus the drawing position of every code bit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagLayout {
    width: usize,
    cells: Vec<CellKind>,
    /// `(x, y)` cell of code bit `i`, where bit 0 is the most significant.
    bit_cells: Vec<(usize, usize)>,
}

impl TagLayout {
    /// Parse a layout from rows of `d`/`b`/`w` characters.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, TagFamilyError> {
        let width = rows.len();
        if width == 0 {
            return Err(TagFamilyError::EmptyLayout);
        }

        let mut cells = Vec::with_capacity(width * width);
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let len = row.chars().count();
            if len != width {
                return Err(TagFamilyError::RaggedLayout { row: y, len, width });
            }
            for (x, c) in row.chars().enumerate() {
                let kind = CellKind::from_char(c)
                    .ok_or(TagFamilyError::InvalidCell { cell: c, x, y })?;
                cells.push(kind);
            }
        }

        Self::from_cells(width, cells)
    }

    /// The "standard" layout: a data ring outside a black ring, a white ring,
    /// and a data-filled interior.
    pub fn standard(width: usize) -> Result<Self, TagFamilyError> {
        if width == 0 {
            return Err(TagFamilyError::EmptyLayout);
        }
        Self::from_rows(geometry::standard_rows(width).as_slice())
    }

    fn from_cells(width: usize, cells: Vec<CellKind>) -> Result<Self, TagFamilyError> {
        let data_cells = cells.iter().filter(|&&c| c == CellKind::Data).count();
        if data_cells > 64 {
            return Err(TagFamilyError::TooManyBits { data_cells });
        }

        let mut layout = Self {
            width,
            cells,
            bit_cells: Vec::new(),
        };
        layout.bit_cells =
            geometry::bit_order(width, |x, y| layout.cell(x, y) == Some(CellKind::Data));
        debug_assert_eq!(layout.bit_cells.len(), data_cells);
        Ok(layout)
    }

    /// Side length in cells.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of code bits carried by the layout.
    #[inline]
    pub fn bit_count(&self) -> usize {
        self.bit_cells.len()
    }

    #[inline]
    pub fn cell(&self, x: usize, y: usize) -> Option<CellKind> {
        if x >= self.width || y >= self.width {
            return None;
        }
        self.cells.get(y * self.width + x).copied()
    }

    /// Drawing position of each code bit, most significant first.
    #[inline]
    pub fn bit_cells(&self) -> &[(usize, usize)] {
        &self.bit_cells
    }

    /// Layout rows as `d`/`b`/`w` strings.
    pub fn to_rows(&self) -> Vec<String> {
        self.cells
            .chunks(self.width)
            .map(|row| {
                row.iter()
                    .map(|c| match c {
                        CellKind::Data => 'd',
                        CellKind::Black => 'b',
                        CellKind::White => 'w',
                    })
                    .collect()
            })
            .collect()
    }
}
