//! 三段式版本号解析与递增。
//!
//! 规则：
//! - 只识别前缀 `<major>.<minor>.<patch>`（均为十进制整数）
//! - 预发布/构建后缀（如 `-beta.1`）在递增后丢弃
//! - 递增某一段时，更低的段全部归零
//!
//! 作者：GameCP 扩展工具组
//! 创建时间：2026-10-16
//! 修改时间：2026-10-16

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static VERSION_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)\.(\d+)\.(\d+)").expect("version pattern"));

/// 版本相关错误。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    #[error("version \"{0}\" does not start with <major>.<minor>.<patch>")]
    Malformed(String),
    #[error("unknown bump type \"{0}\" (expected major, minor or patch)")]
    UnknownBump(String),
    #[error("cannot bump {kind} of version {version}: component would overflow")]
    Overflow { version: String, kind: BumpKind },
}

/// 递增类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpKind {
    Major,
    Minor,
    Patch,
}

impl FromStr for BumpKind {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "major" => Ok(BumpKind::Major),
            "minor" => Ok(BumpKind::Minor),
            "patch" => Ok(BumpKind::Patch),
            other => Err(VersionError::UnknownBump(other.to_string())),
        }
    }
}

impl fmt::Display for BumpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BumpKind::Major => "major",
            BumpKind::Minor => "minor",
            BumpKind::Patch => "patch",
        })
    }
}

/// 三段式版本号。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    /// 解析版本号前缀。
    ///
    /// 异常处理：
    /// - 不以 `\d+.\d+.\d+` 开头，或数值溢出 `u64` 时返回 [`VersionError::Malformed`]
    pub fn parse(raw: &str) -> Result<Self, VersionError> {
        let malformed = || VersionError::Malformed(raw.to_string());
        let caps = VERSION_PREFIX.captures(raw).ok_or_else(malformed)?;
        let part = |i: usize| caps[i].parse::<u64>().map_err(|_| malformed());
        Ok(Self {
            major: part(1)?,
            minor: part(2)?,
            patch: part(3)?,
        })
    }

    /// 按类型递增，低位归零。
    ///
    /// 异常处理：
    /// - 被递增的一段已是 `u64::MAX` 时返回 [`VersionError::Overflow`]
    pub fn bump(self, kind: BumpKind) -> Result<Self, VersionError> {
        let overflow = || VersionError::Overflow {
            version: self.to_string(),
            kind,
        };
        let next = match kind {
            BumpKind::Major => Self {
                major: self.major.checked_add(1).ok_or_else(overflow)?,
                minor: 0,
                patch: 0,
            },
            BumpKind::Minor => Self {
                major: self.major,
                minor: self.minor.checked_add(1).ok_or_else(overflow)?,
                patch: 0,
            },
            BumpKind::Patch => Self {
                patch: self.patch.checked_add(1).ok_or_else(overflow)?,
                ..self
            },
        };
        Ok(next)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bump_zeroes_less_significant_parts() {
        let v = Version::parse("1.4.9").unwrap();
        assert_eq!(v.bump(BumpKind::Major).unwrap().to_string(), "2.0.0");
        assert_eq!(v.bump(BumpKind::Minor).unwrap().to_string(), "1.5.0");
        assert_eq!(v.bump(BumpKind::Patch).unwrap().to_string(), "1.4.10");
    }

    #[test]
    fn bump_at_u64_max_is_an_error_not_a_wrap() {
        let v = Version::parse("18446744073709551615.0.0").unwrap();
        assert!(matches!(
            v.bump(BumpKind::Major),
            Err(VersionError::Overflow { kind: BumpKind::Major, .. })
        ));
        assert_eq!(
            v.bump(BumpKind::Minor).unwrap().to_string(),
            "18446744073709551615.1.0"
        );

        let v = Version::parse("1.2.18446744073709551615").unwrap();
        assert!(matches!(
            v.bump(BumpKind::Patch),
            Err(VersionError::Overflow { kind: BumpKind::Patch, .. })
        ));
        assert_eq!(v.bump(BumpKind::Minor).unwrap().to_string(), "1.3.0");
    }

    #[test]
    fn prerelease_suffix_is_dropped() {
        let v = Version::parse("0.9.1-beta.2").unwrap();
        assert_eq!(v.bump(BumpKind::Patch).unwrap().to_string(), "0.9.2");
    }

    #[test]
    fn malformed_versions_are_rejected() {
        for raw in ["", "1.2", "v1.2.3", "a.b.c"] {
            assert_eq!(
                Version::parse(raw),
                Err(VersionError::Malformed(raw.to_string()))
            );
        }
    }

    #[test]
    fn bump_kind_parses_known_names() {
        assert_eq!("minor".parse::<BumpKind>().unwrap(), BumpKind::Minor);
        assert!(matches!(
            "huge".parse::<BumpKind>(),
            Err(VersionError::UnknownBump(_))
        ));
    }
}
