//! Servo channels and the channel → register map
//!
//! Channels 0-15 live on chip A, 16-31 on chip B. Every channel owns one
//! four-byte register block (on-low, on-high, off-low, off-high) starting
//! at [`reg::CHANNEL_BLOCK_BASE`] on its chip.
//!
//! The map is a `const` table indexed by [`ChannelId`]; there is no way to
//! ask for a channel that does not exist.

use crate::registers::{block, reg};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of servo outputs on the shield
pub const CHANNEL_COUNT: usize = 32;

/// Number of outputs driven by one PCA9685
pub const CHANNELS_PER_CHIP: usize = 16;

/// One of the two PWM controllers on the shield
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ChipSelect {
    /// First controller, servos 1-16
    A,
    /// Second controller, servos 17-32
    B,
}

impl ChipSelect {
    /// Both chips, in initialization order
    pub const ALL: [ChipSelect; 2] = [ChipSelect::A, ChipSelect::B];

    /// Array index of this chip (A = 0, B = 1)
    pub const fn index(self) -> usize {
        match self {
            ChipSelect::A => 0,
            ChipSelect::B => 1,
        }
    }
}

/// Servo output identifier
///
/// Discriminants are the 0-based channel index and are stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum ChannelId {
    Servo1 = 0,
    Servo2 = 1,
    Servo3 = 2,
    Servo4 = 3,
    Servo5 = 4,
    Servo6 = 5,
    Servo7 = 6,
    Servo8 = 7,
    Servo9 = 8,
    Servo10 = 9,
    Servo11 = 10,
    Servo12 = 11,
    Servo13 = 12,
    Servo14 = 13,
    Servo15 = 14,
    Servo16 = 15,
    Servo17 = 16,
    Servo18 = 17,
    Servo19 = 18,
    Servo20 = 19,
    Servo21 = 20,
    Servo22 = 21,
    Servo23 = 22,
    Servo24 = 23,
    Servo25 = 24,
    Servo26 = 25,
    Servo27 = 26,
    Servo28 = 27,
    Servo29 = 28,
    Servo30 = 29,
    Servo31 = 30,
    Servo32 = 31,
}

impl ChannelId {
    /// Every channel in index order
    pub const ALL: [ChannelId; CHANNEL_COUNT] = {
        use ChannelId::*;
        [
            Servo1, Servo2, Servo3, Servo4, Servo5, Servo6, Servo7, Servo8, Servo9, Servo10,
            Servo11, Servo12, Servo13, Servo14, Servo15, Servo16, Servo17, Servo18, Servo19,
            Servo20, Servo21, Servo22, Servo23, Servo24, Servo25, Servo26, Servo27, Servo28,
            Servo29, Servo30, Servo31, Servo32,
        ]
    };

    /// 0-based channel index
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Chip that drives this channel
    pub const fn chip(self) -> ChipSelect {
        lookup(self).chip
    }

    /// Register block of this channel
    pub const fn register(self) -> RegisterEntry {
        lookup(self)
    }
}

/// Channel index outside 0-31
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InvalidChannel(pub u8);

impl TryFrom<u8> for ChannelId {
    type Error = InvalidChannel;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        ChannelId::ALL
            .get(index as usize)
            .copied()
            .ok_or(InvalidChannel(index))
    }
}

impl From<ChannelId> for u8 {
    fn from(channel: ChannelId) -> Self {
        channel.index()
    }
}

/// Location of a channel's register block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegisterEntry {
    /// Owning chip
    pub chip: ChipSelect,
    /// Address of the block's first byte (on-low)
    pub base: u8,
}

impl RegisterEntry {
    /// Address of the off-edge low byte, where pulse writes start
    pub const fn off_l(&self) -> u8 {
        self.base + block::OFF_L
    }

    /// Address of the off-edge high byte
    pub const fn off_h(&self) -> u8 {
        self.base + block::OFF_H
    }
}

/// Channel → register table, one entry per [`ChannelId`]
pub const REGISTER_MAP: [RegisterEntry; CHANNEL_COUNT] = build_register_map();

const fn build_register_map() -> [RegisterEntry; CHANNEL_COUNT] {
    let mut map = [RegisterEntry {
        chip: ChipSelect::A,
        base: reg::CHANNEL_BLOCK_BASE,
    }; CHANNEL_COUNT];

    let mut i = 0;
    while i < CHANNEL_COUNT {
        let chip = if i < CHANNELS_PER_CHIP {
            ChipSelect::A
        } else {
            ChipSelect::B
        };
        let slot = (i % CHANNELS_PER_CHIP) as u8;
        map[i] = RegisterEntry {
            chip,
            base: reg::CHANNEL_BLOCK_BASE + slot * reg::CHANNEL_BLOCK_STRIDE,
        };
        i += 1;
    }
    map
}

/// Resolve a channel to its chip and register block
pub const fn lookup(channel: ChannelId) -> RegisterEntry {
    REGISTER_MAP[channel as usize]
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_first_and_last_channel() {
        assert_eq!(
            lookup(ChannelId::Servo1),
            RegisterEntry {
                chip: ChipSelect::A,
                base: 0x08
            }
        );
        assert_eq!(
            lookup(ChannelId::Servo16),
            RegisterEntry {
                chip: ChipSelect::A,
                base: 0x44
            }
        );
        assert_eq!(
            lookup(ChannelId::Servo17),
            RegisterEntry {
                chip: ChipSelect::B,
                base: 0x08
            }
        );
        assert_eq!(
            lookup(ChannelId::Servo32),
            RegisterEntry {
                chip: ChipSelect::B,
                base: 0x44
            }
        );
    }

    #[test]
    fn test_chip_split() {
        for channel in ChannelId::ALL {
            let expected = if channel.index() < 16 {
                ChipSelect::A
            } else {
                ChipSelect::B
            };
            assert_eq!(channel.chip(), expected);
        }
    }

    #[test]
    fn test_stride_within_chip() {
        for pair in ChannelId::ALL.windows(2) {
            let (prev, next) = (lookup(pair[0]), lookup(pair[1]));
            if prev.chip == next.chip {
                assert_eq!(next.base, prev.base + 4);
            } else {
                // Chip boundary restarts the block numbering
                assert_eq!(next.base, reg::CHANNEL_BLOCK_BASE);
            }
        }
    }

    #[test]
    fn test_all_is_index_ordered() {
        for (i, channel) in ChannelId::ALL.iter().enumerate() {
            assert_eq!(channel.index() as usize, i);
        }
    }

    #[test]
    fn test_off_registers() {
        let entry = lookup(ChannelId::Servo1);
        assert_eq!(entry.off_l(), 0x0A);
        assert_eq!(entry.off_h(), 0x0B);
    }

    #[test]
    fn test_try_from_rejects_out_of_range() {
        assert_eq!(ChannelId::try_from(32), Err(InvalidChannel(32)));
        assert_eq!(ChannelId::try_from(255), Err(InvalidChannel(255)));
    }

    proptest! {
        #[test]
        fn prop_try_from_roundtrips_index(index in 0u8..32) {
            let channel = ChannelId::try_from(index).unwrap();
            prop_assert_eq!(u8::from(channel), index);
        }

        #[test]
        fn prop_base_matches_slot(index in 0u8..32) {
            let entry = lookup(ChannelId::try_from(index).unwrap());
            let slot = index % 16;
            prop_assert_eq!(entry.base, 0x08 + slot * 4);
            // Block must fit below PRE_SCALE
            prop_assert!(entry.off_h() < reg::PRE_SCALE);
        }
    }
}
