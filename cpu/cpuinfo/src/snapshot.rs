//! Raw feature words copied out of the leaf caches.

use crate::cpuid::CpuidResult;
use crate::leaves::{
    EXTENDED_FEATURES, EXTENDED_FEATURES_EXTENSION, EXTENDED_STATE, EXTENDED_STATE_SUB_1,
    FEATURES, STRUCTURED_EXTENDED_FEATURES, STRUCTURED_EXTENDED_FEATURES_SUB_1,
};
use core::fmt;

/// A CPUID output register.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Register {
    Eax,
    Ebx,
    Ecx,
    Edx,
}

impl Register {
    #[must_use]
    pub const fn select(self, regs: &CpuidResult) -> u32 {
        match self {
            Self::Eax => regs.eax,
            Self::Ebx => regs.ebx,
            Self::Ecx => regs.ecx,
            Self::Edx => regs.edx,
        }
    }
}

/// One 32-bit word of feature flags and the `(leaf, subleaf, register)` it is copied from.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum FeatureWord {
    Leaf01Ecx,
    Leaf01Edx,
    Leaf07Ebx,
    Leaf07Ecx,
    Leaf07Edx,
    Leaf07Sub1Eax,
    Leaf0DSub1Eax,
    Leaf0DSub1Ebx,
    Ext01Ecx,
    Ext01Edx,
    Ext08Ebx,
}

impl FeatureWord {
    pub const ALL: [Self; 11] = [
        Self::Leaf01Ecx,
        Self::Leaf01Edx,
        Self::Leaf07Ebx,
        Self::Leaf07Ecx,
        Self::Leaf07Edx,
        Self::Leaf07Sub1Eax,
        Self::Leaf0DSub1Eax,
        Self::Leaf0DSub1Ebx,
        Self::Ext01Ecx,
        Self::Ext01Edx,
        Self::Ext08Ebx,
    ];

    #[must_use]
    pub const fn leaf(self) -> u32 {
        match self {
            Self::Leaf01Ecx | Self::Leaf01Edx => FEATURES,
            Self::Leaf07Ebx | Self::Leaf07Ecx | Self::Leaf07Edx | Self::Leaf07Sub1Eax => {
                STRUCTURED_EXTENDED_FEATURES
            }
            Self::Leaf0DSub1Eax | Self::Leaf0DSub1Ebx => EXTENDED_STATE,
            Self::Ext01Ecx | Self::Ext01Edx => EXTENDED_FEATURES,
            Self::Ext08Ebx => EXTENDED_FEATURES_EXTENSION,
        }
    }

    #[must_use]
    pub const fn subleaf(self) -> u32 {
        match self {
            Self::Leaf07Sub1Eax => STRUCTURED_EXTENDED_FEATURES_SUB_1,
            Self::Leaf0DSub1Eax | Self::Leaf0DSub1Ebx => EXTENDED_STATE_SUB_1,
            _ => 0,
        }
    }

    #[must_use]
    pub const fn register(self) -> Register {
        match self {
            Self::Leaf07Sub1Eax | Self::Leaf0DSub1Eax => Register::Eax,
            Self::Leaf07Ebx | Self::Leaf0DSub1Ebx | Self::Ext08Ebx => Register::Ebx,
            Self::Leaf01Ecx | Self::Leaf07Ecx | Self::Ext01Ecx => Register::Ecx,
            Self::Leaf01Edx | Self::Leaf07Edx | Self::Ext01Edx => Register::Edx,
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for FeatureWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CPUID.({:#x}.{}):{:?}",
            self.leaf(),
            self.subleaf(),
            self.register()
        )
    }
}

/// A single bit within a [`FeatureWord`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct FeatureBit {
    pub word: FeatureWord,
    pub bit: u8,
}

impl FeatureBit {
    #[must_use]
    pub const fn new(word: FeatureWord, bit: u8) -> Self {
        Self { word, bit }
    }

    #[must_use]
    pub const fn mask(self) -> u32 {
        1 << (self.bit & 31)
    }
}

/// Every feature word, zero until its leaf is known to be supported.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct FeatureSnapshot {
    words: [u32; FeatureWord::ALL.len()],
}

impl FeatureSnapshot {
    /// All bits clear.
    pub const EMPTY: Self = Self {
        words: [0; FeatureWord::ALL.len()],
    };

    #[must_use]
    pub const fn word(&self, word: FeatureWord) -> u32 {
        self.words[word.index()]
    }

    #[must_use]
    pub const fn test(&self, bit: FeatureBit) -> bool {
        self.word(bit.word) & bit.mask() != 0
    }

    pub const fn set_word(&mut self, word: FeatureWord, value: u32) {
        self.words[word.index()] = value;
    }

    /// Copy every word stored in `regs` for `(leaf, subleaf)`.
    pub fn capture(&mut self, leaf: u32, subleaf: u32, regs: &CpuidResult) {
        for word in FeatureWord::ALL {
            if word.leaf() == leaf && word.subleaf() == subleaf {
                self.set_word(word, word.register().select(regs));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_selects_matching_words() {
        let mut snapshot = FeatureSnapshot::EMPTY;
        let regs = CpuidResult::new(1, 2, 3, 4);

        snapshot.capture(STRUCTURED_EXTENDED_FEATURES, 0, &regs);
        assert_eq!(snapshot.word(FeatureWord::Leaf07Ebx), 2);
        assert_eq!(snapshot.word(FeatureWord::Leaf07Ecx), 3);
        assert_eq!(snapshot.word(FeatureWord::Leaf07Edx), 4);
        assert_eq!(snapshot.word(FeatureWord::Leaf07Sub1Eax), 0);

        snapshot.capture(EXTENDED_STATE, 1, &regs);
        assert_eq!(snapshot.word(FeatureWord::Leaf0DSub1Eax), 1);
        assert_eq!(snapshot.word(FeatureWord::Leaf0DSub1Ebx), 2);
    }

    #[test]
    fn plain_leaves_use_subleaf_zero() {
        for word in [
            FeatureWord::Leaf01Ecx,
            FeatureWord::Leaf01Edx,
            FeatureWord::Ext01Ecx,
            FeatureWord::Ext01Edx,
            FeatureWord::Ext08Ebx,
        ] {
            assert_eq!(word.subleaf(), 0, "{word}");
        }
        assert_eq!(FeatureWord::Leaf07Sub1Eax.subleaf(), 1);
        assert_eq!(FeatureWord::Leaf0DSub1Ebx.subleaf(), 1);
    }

    #[test]
    fn test_reads_single_bit() {
        let mut snapshot = FeatureSnapshot::EMPTY;
        snapshot.set_word(FeatureWord::Leaf01Ecx, 1 << 28);
        assert!(snapshot.test(FeatureBit::new(FeatureWord::Leaf01Ecx, 28)));
        assert!(!snapshot.test(FeatureBit::new(FeatureWord::Leaf01Ecx, 27)));
        assert!(!snapshot.test(FeatureBit::new(FeatureWord::Leaf01Edx, 28)));
    }

    #[test]
    fn display_names_the_source() {
        assert_eq!(
            alloc::format!("{}", FeatureWord::Leaf0DSub1Eax),
            "CPUID.(0xd.1):Eax"
        );
    }
}
