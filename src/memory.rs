/// Memory interface for next-address prediction.

/// A read-only 32-bit memory interface.
/// Capable of loading bytes (8-bit), halfwords (16-bit), and words (32-bit).
///
/// The predictor only reads memory when an instruction loads into the PC
/// (so the target of the step is a value in memory). Addresses passed in are
/// guaranteed to be the addresses the stepped instruction would access; the
/// implementor must only be handed mapped memory.
pub trait Mem32 {
    fn load_byte(&self, addr: u32) -> u8;

    fn load_halfword(&self, addr: u32) -> u16;

    fn load_word(&self, addr: u32) -> u32;
}
