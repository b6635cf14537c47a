//! Trace column layout and row access.
//!
//! Columns come in two kinds: *unshifted* columns, which own their data, and *shifted*
//! columns, whose value at row `i` is the value of their source column at row `i + 1`
//! (zero past the last row). Only unshifted columns are stored; shifted values are read on
//! demand when a row is materialised.

use std::ops::{Index, IndexMut};

use strum::{EnumCount, IntoEnumIterator};
use strum_macros::{EnumCount as EnumCountMacro, EnumIter, IntoStaticStr};

use crate::field::HonkField;
use crate::utils::errors::ProtoGalaxyError;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, EnumCountMacro, EnumIter, IntoStaticStr,
)]
pub enum HonkColumn {
    // Precomputed selectors
    QM,
    QC,
    QL,
    QR,
    QO,
    Q4,
    QArith,
    QLookup,
    // Copy-constraint permutation
    Sigma1,
    Sigma2,
    Sigma3,
    Sigma4,
    Id1,
    Id2,
    Id3,
    Id4,
    // Lookup tables
    Table1,
    Table2,
    Table3,
    Table4,
    LagrangeFirst,
    LagrangeLast,
    // Witness
    WL,
    WR,
    WO,
    W4,
    SortedAccum,
    ZPerm,
    ZLookup,
    // Shifted
    Table1Shift,
    Table2Shift,
    Table3Shift,
    Table4Shift,
    WLShift,
    WRShift,
    WOShift,
    W4Shift,
    SortedAccumShift,
    ZPermShift,
    ZLookupShift,
}

/// Number of columns that own data; they precede every shifted column in [`HonkColumn`].
pub const NUM_UNSHIFTED_COLUMNS: usize = HonkColumn::Table1Shift as usize;

impl HonkColumn {
    /// The column a shifted column reads from, or `None` for unshifted columns.
    pub fn shifted_source(self) -> Option<HonkColumn> {
        use HonkColumn::*;
        match self {
            Table1Shift => Some(Table1),
            Table2Shift => Some(Table2),
            Table3Shift => Some(Table3),
            Table4Shift => Some(Table4),
            WLShift => Some(WL),
            WRShift => Some(WR),
            WOShift => Some(WO),
            W4Shift => Some(W4),
            SortedAccumShift => Some(SortedAccum),
            ZPermShift => Some(ZPerm),
            ZLookupShift => Some(ZLookup),
            _ => None,
        }
    }

    pub fn is_shifted(self) -> bool {
        self.shifted_source().is_some()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn unshifted() -> impl Iterator<Item = HonkColumn> {
        Self::iter().take(NUM_UNSHIFTED_COLUMNS)
    }

    pub fn name(self) -> &'static str {
        self.into()
    }
}

/// One value of type `T` per column, e.g. the field values of a single row (verifier form)
/// or their univariate extensions across instances (prover form).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AllEntities<T> {
    values: Vec<T>,
}

impl<T> AllEntities<T> {
    pub fn from_fn(mut f: impl FnMut(HonkColumn) -> T) -> Self {
        Self {
            values: HonkColumn::iter().map(&mut f).collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (HonkColumn, &T)> {
        HonkColumn::iter().zip(self.values.iter())
    }
}

impl<T> Index<HonkColumn> for AllEntities<T> {
    type Output = T;

    #[inline(always)]
    fn index(&self, column: HonkColumn) -> &T {
        &self.values[column.index()]
    }
}

impl<T> IndexMut<HonkColumn> for AllEntities<T> {
    #[inline(always)]
    fn index_mut(&mut self, column: HonkColumn) -> &mut T {
        &mut self.values[column.index()]
    }
}

/// Column-major storage of an execution trace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProverPolynomials<F> {
    columns: Vec<Vec<F>>,
    size: usize,
}

impl<F: HonkField> ProverPolynomials<F> {
    /// Takes one vector per unshifted column, in [`HonkColumn`] order.
    pub fn new(columns: Vec<Vec<F>>) -> Result<Self, ProtoGalaxyError> {
        if columns.len() != NUM_UNSHIFTED_COLUMNS {
            return Err(ProtoGalaxyError::ColumnCountMismatch {
                expected: NUM_UNSHIFTED_COLUMNS,
                got: columns.len(),
            });
        }
        let size = columns[0].len();
        for (column, values) in HonkColumn::unshifted().zip(columns.iter()) {
            if values.len() != size {
                return Err(ProtoGalaxyError::ColumnLengthMismatch {
                    column: column.name(),
                    expected: size,
                    got: values.len(),
                });
            }
        }
        Ok(Self { columns, size })
    }

    pub fn zero(size: usize) -> Self {
        Self {
            columns: vec![vec![F::zero(); size]; NUM_UNSHIFTED_COLUMNS],
            size,
        }
    }

    /// Number of rows.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn columns(&self) -> &[Vec<F>] {
        &self.columns
    }

    /// Value of `column` at `row`, resolving shifted columns against their source.
    #[inline]
    pub fn value(&self, column: HonkColumn, row: usize) -> F {
        match column.shifted_source() {
            Some(source) if row + 1 < self.size => self.columns[source.index()][row + 1],
            Some(_) => F::zero(),
            None => self.columns[column.index()][row],
        }
    }

    /// Materialises every column, shifted ones included, at `row`.
    pub fn get_row(&self, row: usize) -> AllEntities<F> {
        AllEntities::from_fn(|column| self.value(column, row))
    }
}

impl<F> Index<HonkColumn> for ProverPolynomials<F> {
    type Output = [F];

    fn index(&self, column: HonkColumn) -> &[F] {
        assert!(!column.is_shifted(), "shifted columns are not stored");
        &self.columns[column.index()]
    }
}

impl<F> IndexMut<HonkColumn> for ProverPolynomials<F> {
    fn index_mut(&mut self, column: HonkColumn) -> &mut [F] {
        assert!(!column.is_shifted(), "shifted columns are not stored");
        &mut self.columns[column.index()]
    }
}

impl<F: HonkField> ProverPolynomials<F> {
    /// Builds from per-column vectors, without checking them.
    pub(crate) fn from_columns_unchecked(columns: Vec<Vec<F>>, size: usize) -> Self {
        Self { columns, size }
    }
}
