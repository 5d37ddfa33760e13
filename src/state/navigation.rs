//! Keyboard navigation over the capture grid.

/// Keys the popover reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationKey {
    TogglePreview,
    Left,
    Right,
    Up,
    Down,
    Open,
    Other,
}

impl NavigationKey {
    /// Signed index step for a directional key on a grid `columns` wide.
    pub fn step(self, columns: u8) -> Option<isize> {
        let columns = isize::from(columns.max(1));
        match self {
            NavigationKey::Left => Some(-1),
            NavigationKey::Right => Some(1),
            NavigationKey::Up => Some(-columns),
            NavigationKey::Down => Some(columns),
            _ => None,
        }
    }
}

/// Applies `step` to the current position and clamps into `0..len`.
///
/// No selection counts as one before the first item, so any directional key
/// on a non-empty list can land on index 0. Returns `None` for an empty list.
pub fn target_index(current: Option<usize>, step: isize, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let current = current.map(|index| index as isize).unwrap_or(-1);
    let last = (len - 1) as isize;
    Some((current + step).clamp(0, last) as usize)
}
