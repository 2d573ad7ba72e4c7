// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FocusSection {
    Firm,
    Host,
    Templates,
    Details,
    Output,
}

impl FocusSection {
    pub const ALL: [Self; 5] = [
        Self::Firm,
        Self::Host,
        Self::Templates,
        Self::Details,
        Self::Output,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Firm => "Firm",
            Self::Host => "Host",
            Self::Templates => "Templates",
            Self::Details => "Details",
            Self::Output => "Output",
        }
    }

    pub fn next(self) -> Self {
        self.rotate(1)
    }

    pub fn prev(self) -> Self {
        self.rotate(-1)
    }

    // The layout is two columns over a full-width output row, not a grid.
    pub const fn up(self) -> Self {
        match self {
            Self::Templates => Self::Firm,
            Self::Details => Self::Host,
            Self::Output => Self::Templates,
            Self::Firm | Self::Host => self,
        }
    }

    pub const fn down(self) -> Self {
        match self {
            Self::Firm => Self::Templates,
            Self::Host => Self::Details,
            Self::Templates | Self::Details => Self::Output,
            Self::Output => self,
        }
    }

    fn rotate(self, delta: isize) -> Self {
        let current = Self::ALL
            .iter()
            .position(|section| *section == self)
            .unwrap_or(0);
        Self::ALL[crate::wrap_index(current, delta, Self::ALL.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::FocusSection;

    #[test]
    fn next_and_prev_cycle_all_sections() {
        let mut section = FocusSection::Firm;
        for expected in [
            FocusSection::Host,
            FocusSection::Templates,
            FocusSection::Details,
            FocusSection::Output,
            FocusSection::Firm,
        ] {
            section = section.next();
            assert_eq!(section, expected);
        }
        assert_eq!(FocusSection::Firm.prev(), FocusSection::Output);
        for section in FocusSection::ALL {
            assert_eq!(section.next().prev(), section);
        }
    }

    #[test]
    fn vertical_moves_follow_adjacency_table() {
        assert_eq!(FocusSection::Templates.up(), FocusSection::Firm);
        assert_eq!(FocusSection::Details.up(), FocusSection::Host);
        assert_eq!(FocusSection::Output.up(), FocusSection::Templates);
        assert_eq!(FocusSection::Firm.up(), FocusSection::Firm);
        assert_eq!(FocusSection::Host.up(), FocusSection::Host);

        assert_eq!(FocusSection::Firm.down(), FocusSection::Templates);
        assert_eq!(FocusSection::Host.down(), FocusSection::Details);
        assert_eq!(FocusSection::Templates.down(), FocusSection::Output);
        assert_eq!(FocusSection::Details.down(), FocusSection::Output);
        assert_eq!(FocusSection::Output.down(), FocusSection::Output);
    }
}
