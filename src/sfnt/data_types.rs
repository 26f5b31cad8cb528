use std::fmt;

use fixed::types::extra::U16;

/// 16.16-bit signed fixed-point number
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Fixed(pub i32);

impl Fixed {
    pub const fn from_bits(bits: i32) -> Self {
        Self(bits)
    }

    pub const fn to_bits(self) -> i32 {
        self.0
    }

    pub fn to_f32(self) -> f32 {
        fixed::FixedI32::<U16>::from_bits(self.0).to_num()
    }
}

impl fmt::Debug for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fixed({})", self.to_f32())
    }
}

/// 16-bit signed integer that describes a quantity in FUnits, the smallest
/// measurable distance in em space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct FWord(pub i16);

/// The long internal format of a date in seconds since 12:00 midnight,
/// January 1, 1904. It is represented as a signed 64-bit integer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LongDateTime(pub i64);

#[cfg(test)]
mod test {
    use super::Fixed;

    #[test]
    fn fixed_fraction() {
        assert_eq!(Fixed(0x00010000).to_f32(), 1.0);
        assert_eq!(Fixed(0x00018000).to_f32(), 1.5);
        assert_eq!(Fixed(-0x00010000).to_f32(), -1.0);
    }
}
