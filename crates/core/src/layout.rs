//! Layout options: column count, search type, image visibility and sidebar state.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::SearchType;

/// Number of grid columns, always within `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "u8")]
pub struct ColumnCount(u8);

impl ColumnCount {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Build a column count, clamping out-of-range requests to the nearest bound.
    pub fn new(requested: i64) -> Self {
        Self(requested.clamp(Self::MIN as i64, Self::MAX as i64) as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// All valid counts, in order.
    pub fn all() -> impl Iterator<Item = ColumnCount> {
        (Self::MIN..=Self::MAX).map(ColumnCount)
    }

    /// Button label, e.g. "1 Column" / "3 Columns".
    pub fn label(self) -> String {
        if self.0 > 1 { format!("{} Columns", self.0) } else { "1 Column".to_string() }
    }
}

impl Default for ColumnCount {
    fn default() -> Self {
        Self(2)
    }
}

impl From<i64> for ColumnCount {
    fn from(requested: i64) -> Self {
        Self::new(requested)
    }
}

impl From<ColumnCount> for u8 {
    fn from(count: ColumnCount) -> Self {
        count.0
    }
}

/// Responsive breakpoint tiers, smallest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Breakpoint {
    Base,
    Sm,
    Md,
    Lg,
    Xl,
}

impl Breakpoint {
    pub const ALL: [Breakpoint; 5] = [Breakpoint::Base, Breakpoint::Sm, Breakpoint::Md, Breakpoint::Lg, Breakpoint::Xl];

    /// Class prefix, empty for the base tier.
    pub fn prefix(self) -> &'static str {
        match self {
            Breakpoint::Base => "",
            Breakpoint::Sm => "sm:",
            Breakpoint::Md => "md:",
            Breakpoint::Lg => "lg:",
            Breakpoint::Xl => "xl:",
        }
    }

    /// Minimum available width, in terminal cells, for the tier to apply.
    pub fn min_width(self) -> u16 {
        match self {
            Breakpoint::Base => 0,
            Breakpoint::Sm => 64,
            Breakpoint::Md => 96,
            Breakpoint::Lg => 128,
            Breakpoint::Xl => 160,
        }
    }
}

/// Grid classification derived from a column count.
///
/// A count of N activates the first N breakpoint tiers; tier `i` lays out
/// `i + 1` columns. Each classification therefore extends the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridClass {
    columns: ColumnCount,
}

impl GridClass {
    pub fn for_columns(columns: ColumnCount) -> Self {
        Self { columns }
    }

    /// Active `(tier, columns)` pairs, smallest tier first.
    pub fn tiers(&self) -> impl Iterator<Item = (Breakpoint, u8)> + '_ {
        Breakpoint::ALL
            .into_iter()
            .zip(1u8..)
            .take(self.columns.get() as usize)
    }

    /// Columns to lay out in an area `width` cells wide.
    pub fn columns_at(&self, width: u16) -> u8 {
        self.tiers()
            .filter(|(tier, _)| width >= tier.min_width())
            .map(|(_, cols)| cols)
            .last()
            .unwrap_or(1)
    }
}

impl fmt::Display for GridClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (tier, cols)) in self.tiers().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}grid-cols-{}", tier.prefix(), cols)?;
        }
        Ok(())
    }
}

/// User-selected layout state.
///
/// The four settings are independent of each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutState {
    pub columns: ColumnCount,
    pub search_type: SearchType,
    pub show_images: bool,
    pub menu_collapsed: bool,
}

impl Default for LayoutState {
    fn default() -> Self {
        Self { columns: ColumnCount::default(), search_type: SearchType::Web, show_images: true, menu_collapsed: false }
    }
}

impl LayoutState {
    /// Select a column count. Returns whether the value changed.
    pub fn set_columns(&mut self, requested: i64) -> bool {
        let next = ColumnCount::new(requested);
        let changed = next != self.columns;
        self.columns = next;
        changed
    }

    pub fn grid_class(&self) -> GridClass {
        GridClass::for_columns(self.columns)
    }

    pub fn toggle_images(&mut self) {
        self.show_images = !self.show_images;
    }

    pub fn toggle_menu(&mut self) {
        self.menu_collapsed = !self.menu_collapsed;
    }
}
