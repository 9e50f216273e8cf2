// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use bitflags::bitflags;

bitflags! {
    /// What a [`crate::Logger`] stamps after its prefix on each line. Combinable.
    ///
    /// ```text
    /// DATE                  2025/01/31
    /// TIME                  14:05:09
    /// TIME | MICROSECONDS   14:05:09.123456
    /// ISODATE               2025-01-31T14:05:09+01:00
    /// ISODATE|MICROSECONDS  2025-01-31T14:05:09.123456+01:00
    /// ELAPSED               ( 1.25s)   completed lines only
    /// ```
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct LogFlags: u8 {
        const DATE         = 0b0000_0001;
        const TIME         = 0b0000_0010;
        const MICROSECONDS = 0b0000_0100;
        const ISODATE      = 0b0000_1000;
        const ELAPSED      = 0b0001_0000;
        /// The default for the process-wide logger.
        const STD          = Self::DATE.bits() | Self::TIME.bits();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn std_is_date_and_time() {
        assert_eq!(LogFlags::STD, LogFlags::DATE | LogFlags::TIME);
        assert!(!LogFlags::STD.contains(LogFlags::ELAPSED));
        assert!(LogFlags::default().is_empty());
    }
}
