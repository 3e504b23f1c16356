use crate::range::{NumericRange, RangeFilter};
use serde::{Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;

const FINGERPRINT_VERSION: u8 = 0x01;

///
/// FilterKey
/// SHA-256 identity of a range filter's structure.
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct FilterKey([u8; 32]);

impl FilterKey {
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for FilterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl Serialize for FilterKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Hash storage name, kind, bounds, and inclusivity into one key.
pub(super) fn fingerprint_range(filter: &RangeFilter) -> FilterKey {
    let mut hasher = Sha256::new();

    write_tag(&mut hasher, FINGERPRINT_VERSION);
    write_str(&mut hasher, filter.storage_name());
    write_tag(&mut hasher, filter.kind().tag());
    match filter.range() {
        NumericRange::Int32(bounds) => {
            write_bound(&mut hasher, bounds.lower.map(i32::to_be_bytes));
            write_bound(&mut hasher, bounds.upper.map(i32::to_be_bytes));
        }
        NumericRange::Int64(bounds) => {
            write_bound(&mut hasher, bounds.lower.map(i64::to_be_bytes));
            write_bound(&mut hasher, bounds.upper.map(i64::to_be_bytes));
        }
        NumericRange::Float32(bounds) => {
            write_bound(&mut hasher, bounds.lower.map(|v| canonical_f32(v).to_be_bytes()));
            write_bound(&mut hasher, bounds.upper.map(|v| canonical_f32(v).to_be_bytes()));
        }
        NumericRange::Float64(bounds) => {
            write_bound(&mut hasher, bounds.lower.map(|v| canonical_f64(v).to_be_bytes()));
            write_bound(&mut hasher, bounds.upper.map(|v| canonical_f64(v).to_be_bytes()));
        }
    }
    write_flag(&mut hasher, filter.include_lower());
    write_flag(&mut hasher, filter.include_upper());

    let digest = hasher.finalize();
    let mut key = [0u8; 32];
    key.copy_from_slice(&digest);

    FilterKey(key)
}

// -0.0 and 0.0 bound the same values; hash them identically.
fn canonical_f32(value: f32) -> u32 {
    if value == 0.0 { 0.0f32.to_bits() } else { value.to_bits() }
}

fn canonical_f64(value: f64) -> u64 {
    if value == 0.0 { 0.0f64.to_bits() } else { value.to_bits() }
}

///
/// Encode one optional bound: presence tag, then big-endian bytes.
///

fn write_bound<const N: usize>(hasher: &mut Sha256, bytes: Option<[u8; N]>) {
    match bytes {
        Some(bytes) => {
            write_tag(hasher, 0x01);
            hasher.update(bytes);
        }
        None => write_tag(hasher, 0x00),
    }
}

fn write_flag(hasher: &mut Sha256, flag: bool) {
    write_tag(hasher, u8::from(flag));
}

///
/// Encode one string with length prefix.
///

fn write_str(hasher: &mut Sha256, value: &str) {
    let len = u32::try_from(value.len()).unwrap_or(u32::MAX);
    hasher.update(len.to_be_bytes());
    hasher.update(value.as_bytes());
}

fn write_tag(hasher: &mut Sha256, tag: u8) {
    hasher.update([tag]);
}
