//! Menu modes

/// Entries of the top-level menu, in cursor order
pub const MENU_ITEMS: [&str; 4] = [
    "Show Start Date",
    "Set Start Date",
    "Set Moisture",
    "Calib Moisture",
];

/// Menu modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuMode {
    /// Browsing the top-level menu (initial and idle target)
    #[default]
    Menu,
    /// Showing the stored start date
    ViewStartDate,
    /// Setting the start date to today
    SetStartDate,
    /// Adjusting the moisture threshold with the encoder
    SetMoistureThreshold,
    /// Kicking off a sensor calibration run
    CalibrateSensor,
}

impl MenuMode {
    /// Mode entered when the button is pressed on menu entry `index`
    ///
    /// `index` must already be clamped to the menu range.
    pub fn from_menu_index(index: usize) -> Self {
        match index {
            0 => MenuMode::ViewStartDate,
            1 => MenuMode::SetStartDate,
            2 => MenuMode::SetMoistureThreshold,
            _ => MenuMode::CalibrateSensor,
        }
    }

    pub fn is_menu(&self) -> bool {
        matches!(self, MenuMode::Menu)
    }
}

/// Clamp a signed cursor into the menu range
pub fn clamp_menu_cursor(cursor: i32) -> usize {
    cursor.clamp(0, MENU_ITEMS.len() as i32 - 1) as usize
}
