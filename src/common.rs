/// Common bit and byte manip.

/// Set the nth bit.
pub const fn bit(n: usize) -> u32 {
    1 << n
}

/// Set all bits between the top and bottom (inclusive).
pub const fn bits(mut bottom: usize, top: usize) -> u32 {
    let mut out = 0;
    while bottom <= top {
        out |= bit(bottom);
        bottom += 1;
    }
    return out;
}

/// Check if the nth bit is set.
pub const fn test_bit(val: u32, n: usize) -> bool {
    (val & bit(n)) != 0
}

/// Extract the bit field between bottom and top (inclusive), shifted down.
pub const fn field(val: u32, bottom: usize, top: usize) -> u32 {
    (val & bits(bottom, top)) >> bottom
}

/// Sign-extend the low `from` bits of a value to a full signed word.
pub const fn sign_extend(val: u32, from: usize) -> i32 {
    let shift = 32 - from;
    ((val << shift) as i32) >> shift
}

/// Make a 64-bit value from two 32-bit values (high to low).
pub const fn make_64(hi: u32, lo: u32) -> u64 {
    ((hi as u64) << 32) | (lo as u64)
}

/// Get the low word of a doubleword.
pub const fn lo_64(val: u64) -> u32 {
    val as u32
}

/// Get the high word of a doubleword.
pub const fn hi_64(val: u64) -> u32 {
    (val >> 32) as u32
}

/// Get the low halfword as a signed word.
pub const fn lo_signed_16(val: u32) -> i32 {
    val as u16 as i16 as i32
}

/// Get the high halfword as a signed word.
pub const fn hi_signed_16(val: u32) -> i32 {
    (val >> 16) as u16 as i16 as i32
}

/// Get the nth byte as a signed word.
pub const fn signed_byte(val: u32, n: usize) -> i32 {
    (val >> (n * 8)) as u8 as i8 as i32
}

/// Get the nth byte, zero-extended.
pub const fn byte_of(val: u32, n: usize) -> u32 {
    (val >> (n * 8)) & 0xFF
}

/// Pack two halfwords (high to low) into a word.
pub const fn pack_16(hi: u32, lo: u32) -> u32 {
    (hi << 16) | (lo & 0xFFFF)
}

/// Pack four bytes (high to low) into a word.
pub const fn pack_8(b3: u32, b2: u32, b1: u32, b0: u32) -> u32 {
    ((b3 & 0xFF) << 24) | ((b2 & 0xFF) << 16) | ((b1 & 0xFF) << 8) | (b0 & 0xFF)
}

/// Saturate a signed value to `width` bits (1 to 32).
pub const fn ssat(val: i32, width: usize) -> i32 {
    let max = (1_i64 << (width - 1)) - 1;
    let min = -(1_i64 << (width - 1));
    let v = val as i64;
    if v > max {
        max as i32
    } else if v < min {
        min as i32
    } else {
        val
    }
}

/// Saturate a signed value to an unsigned `width`-bit range (0 to 32).
pub const fn usat(val: i32, width: usize) -> u32 {
    let max = if width >= 32 { u32::MAX as i64 } else { (1_i64 << width) - 1 };
    let v = val as i64;
    if v > max {
        max as u32
    } else if v < 0 {
        0
    } else {
        val as u32
    }
}

/// Saturate a 64-bit signed value to the signed 32-bit range.
pub const fn ssat_64(val: i64) -> i32 {
    if val > i32::MAX as i64 {
        i32::MAX
    } else if val < i32::MIN as i64 {
        i32::MIN
    } else {
        val as i32
    }
}
