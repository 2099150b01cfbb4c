//! Home pages shown in the idle state. Up/Down cycle through them.

/// Second line onward of the idle screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HomePage {
    /// Temperature and relative humidity.
    #[default]
    Climate,
    /// CO2 concentration from the analog sensor.
    Co2,
}

/// Number of home pages.
pub const PAGE_COUNT: usize = HomePage::ALL.len();

impl HomePage {
    /// Pages in scroll order.
    pub const ALL: [HomePage; 2] = [HomePage::Climate, HomePage::Co2];

    /// Position in [`HomePage::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Page after this one, wrapping from the last to the first.
    #[allow(clippy::arithmetic_side_effects)] // PAGE_COUNT is non-zero
    pub fn next(self) -> Self {
        Self::ALL
            .get(self.index().wrapping_add(1) % PAGE_COUNT)
            .copied()
            .unwrap_or_default()
    }

    /// Page before this one, wrapping from the first to the last.
    pub fn previous(self) -> Self {
        Self::ALL
            .get(self.index().checked_sub(1).unwrap_or(PAGE_COUNT.saturating_sub(1)))
            .copied()
            .unwrap_or_default()
    }
}
