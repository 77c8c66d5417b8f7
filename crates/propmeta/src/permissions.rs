//! Reflection Permissions
//!
//! Controls whether accessors may touch non-public members. Accessors
//! capture the permission set of the builder that created them and check
//! it on every invocation; public members only need the `*_PUBLIC` flag,
//! non-public members the matching `*_PRIVATE` flag.
//!
//! Permissions are written as flag names in configuration:
//!
//! ```toml
//! permissions = "PUBLIC_ONLY"
//! # or combined
//! permissions = "READ_ALL|INVOKE_PUBLIC"
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Reflection permission flags (bitflags)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReflectionPermission(u8);

impl ReflectionPermission {
    /// No reflection allowed
    pub const NONE: Self = Self(0x00);
    /// Read public fields
    pub const READ_PUBLIC: Self = Self(0x01);
    /// Read non-public fields
    pub const READ_PRIVATE: Self = Self(0x02);
    /// Write public fields
    pub const WRITE_PUBLIC: Self = Self(0x04);
    /// Write non-public fields
    pub const WRITE_PRIVATE: Self = Self(0x08);
    /// Invoke public methods
    pub const INVOKE_PUBLIC: Self = Self(0x10);
    /// Invoke non-public methods
    pub const INVOKE_PRIVATE: Self = Self(0x20);

    // Common combinations
    /// READ_PUBLIC | READ_PRIVATE
    pub const READ_ALL: Self = Self(0x03);
    /// WRITE_PUBLIC | WRITE_PRIVATE
    pub const WRITE_ALL: Self = Self(0x0C);
    /// INVOKE_PUBLIC | INVOKE_PRIVATE
    pub const INVOKE_ALL: Self = Self(0x30);
    /// READ_PUBLIC | WRITE_PUBLIC | INVOKE_PUBLIC
    pub const PUBLIC_ONLY: Self = Self(0x15);
    /// READ_PRIVATE | WRITE_PRIVATE | INVOKE_PRIVATE
    pub const PRIVATE_ALL: Self = Self(0x2A);
    /// Everything
    pub const ALL: Self = Self(0x3F);

    const NAMED: [(&'static str, Self); 14] = [
        ("NONE", Self::NONE),
        ("READ_PUBLIC", Self::READ_PUBLIC),
        ("READ_PRIVATE", Self::READ_PRIVATE),
        ("WRITE_PUBLIC", Self::WRITE_PUBLIC),
        ("WRITE_PRIVATE", Self::WRITE_PRIVATE),
        ("INVOKE_PUBLIC", Self::INVOKE_PUBLIC),
        ("INVOKE_PRIVATE", Self::INVOKE_PRIVATE),
        ("READ_ALL", Self::READ_ALL),
        ("WRITE_ALL", Self::WRITE_ALL),
        ("INVOKE_ALL", Self::INVOKE_ALL),
        ("PUBLIC_ONLY", Self::PUBLIC_ONLY),
        ("PRIVATE_ALL", Self::PRIVATE_ALL),
        ("ALL", Self::ALL),
        ("FULL_ACCESS", Self::ALL),
    ];

    /// Create from raw bits
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & Self::ALL.0)
    }

    /// Get raw bits
    pub const fn bits(&self) -> u8 {
        self.0
    }

    /// Check if permission contains a flag
    pub const fn contains(&self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Union of permissions
    pub const fn union(&self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Difference (remove flags)
    pub const fn difference(&self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// Parse a single flag name, or a hex / decimal bit value
    pub fn parse(s: &str) -> Option<Self> {
        let upper = s.trim().to_uppercase();
        if let Some((_, perm)) = Self::NAMED.iter().find(|(name, _)| *name == upper) {
            return Some(*perm);
        }
        if let Some(hex) = upper.strip_prefix("0X") {
            u8::from_str_radix(hex, 16).ok().map(Self::from_bits)
        } else {
            upper.parse::<u8>().ok().map(Self::from_bits)
        }
    }

    /// Parse combined flags from pipe-separated string (e.g., "READ_PUBLIC|WRITE_PUBLIC")
    pub fn parse_combined(s: &str) -> Option<Self> {
        s.split('|')
            .try_fold(Self::NONE, |acc, part| Self::parse(part).map(|p| acc.union(p)))
    }

    /// Whether a field of the given visibility may be read
    pub fn allows_read(&self, is_public: bool) -> bool {
        self.contains(if is_public {
            Self::READ_PUBLIC
        } else {
            Self::READ_PRIVATE
        })
    }

    /// Whether a field of the given visibility may be written
    pub fn allows_write(&self, is_public: bool) -> bool {
        self.contains(if is_public {
            Self::WRITE_PUBLIC
        } else {
            Self::WRITE_PRIVATE
        })
    }

    /// Whether a method of the given visibility may be invoked
    pub fn allows_invoke(&self, is_public: bool) -> bool {
        self.contains(if is_public {
            Self::INVOKE_PUBLIC
        } else {
            Self::INVOKE_PRIVATE
        })
    }

    /// Whether access checks on non-public members can be suppressed
    pub fn can_control_member_accessible(&self) -> bool {
        self.contains(Self::PRIVATE_ALL)
    }
}

impl Default for ReflectionPermission {
    fn default() -> Self {
        Self::ALL
    }
}

impl fmt::Display for ReflectionPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match Self::NAMED.iter().find(|(_, perm)| perm == self) {
            Some((name, _)) => write!(f, "{}", name),
            None => write!(f, "0x{:02X}", self.0),
        }
    }
}

impl TryFrom<String> for ReflectionPermission {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse_combined(&s).ok_or_else(|| format!("invalid reflection permission '{}'", s))
    }
}

impl From<ReflectionPermission> for String {
    fn from(perm: ReflectionPermission) -> Self {
        perm.to_string()
    }
}
