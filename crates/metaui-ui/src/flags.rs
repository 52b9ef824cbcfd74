//! Boolean widget state packed into flags.

use bitflags::bitflags;

bitflags! {
    /// State flags shared by every widget.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct WidgetFlags: u8 {
        const NONE         = 0b0000_0000;

        /// Not shown at all.
        const HIDDEN       = 0b0000_0001;

        /// Shown but not interactive.
        const DISABLED     = 0b0000_0010;

        /// Caption is not rendered.
        const HIDE_CAPTION = 0b0000_0100;

        /// Value may be displayed but not changed.
        const READONLY     = 0b0000_1000;

        /// A value must be given before actions run.
        const REQUIRED     = 0b0001_0000;
    }
}

impl WidgetFlags {
    /// Whether a user can change the widget's value.
    #[inline]
    pub fn is_editable(&self) -> bool {
        !self.intersects(Self::DISABLED | Self::READONLY)
    }

    /// Whether the widget appears at all.
    #[inline]
    pub fn is_visible(&self) -> bool {
        !self.contains(Self::HIDDEN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_editable() {
        assert!(WidgetFlags::NONE.is_editable());
        assert!(WidgetFlags::REQUIRED.is_editable());
        assert!(!WidgetFlags::READONLY.is_editable());
        assert!(!(WidgetFlags::DISABLED | WidgetFlags::HIDDEN).is_editable());
    }

    #[test]
    fn test_flags_visible() {
        assert!(WidgetFlags::DISABLED.is_visible());
        assert!(!WidgetFlags::HIDDEN.is_visible());
    }
}
