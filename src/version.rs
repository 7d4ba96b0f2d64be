// Axel '0vercl0k' Souchet - October 19 2026
//! Windows releases, as far as the environment blocks are concerned.
use std::fmt::{self, Display};
use std::str::FromStr;

use crate::arch::ArchKind;
use crate::error::{LayoutError, Result};

/// A Windows release in which at least one of the blocks changed shape.
///
/// The variants are ordered chronologically so ranges can be expressed with
/// regular comparisons. Releases that didn't touch any of the blocks (1909,
/// 20H2, 22H2, ...) map to the closest older variant, see
/// [`WinVersion::from_os_version`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WinVersion {
    Nt310,
    Nt350,
    Nt351,
    Nt40,
    Nt50,
    Nt51,
    Nt51Sp2,
    Nt52,
    Nt52Sp1,
    Nt60,
    Nt60Sp1,
    Nt61,
    Nt62,
    Nt63,
    Win10_1507,
    Win10_1511,
    Win10_1607,
    Win10_1703,
    Win10_1709,
    Win10_1803,
    Win10_1809,
    Win10_1903,
    Win10_2004,
    Win11_21H2,
    Win11_23H2,
    Win11_24H2,
}

impl WinVersion {
    pub const ALL: [WinVersion; 26] = [
        Self::Nt310,
        Self::Nt350,
        Self::Nt351,
        Self::Nt40,
        Self::Nt50,
        Self::Nt51,
        Self::Nt51Sp2,
        Self::Nt52,
        Self::Nt52Sp1,
        Self::Nt60,
        Self::Nt60Sp1,
        Self::Nt61,
        Self::Nt62,
        Self::Nt63,
        Self::Win10_1507,
        Self::Win10_1511,
        Self::Win10_1607,
        Self::Win10_1703,
        Self::Win10_1709,
        Self::Win10_1803,
        Self::Win10_1809,
        Self::Win10_1903,
        Self::Win10_2004,
        Self::Win11_21H2,
        Self::Win11_23H2,
        Self::Win11_24H2,
    ];

    pub const LATEST: WinVersion = Self::Win11_24H2;

    /// The first release shipped for 64-bit x86 (Server 2003 SP1 / XP x64).
    pub const FIRST_X64: WinVersion = Self::Nt52Sp1;

    pub const fn name(self) -> &'static str {
        match self {
            Self::Nt310 => "3.10",
            Self::Nt350 => "3.50",
            Self::Nt351 => "3.51",
            Self::Nt40 => "4.0",
            Self::Nt50 => "5.0",
            Self::Nt51 => "5.1",
            Self::Nt51Sp2 => "5.1sp2",
            Self::Nt52 => "5.2",
            Self::Nt52Sp1 => "5.2sp1",
            Self::Nt60 => "6.0",
            Self::Nt60Sp1 => "6.0sp1",
            Self::Nt61 => "6.1",
            Self::Nt62 => "6.2",
            Self::Nt63 => "6.3",
            Self::Win10_1507 => "1507",
            Self::Win10_1511 => "1511",
            Self::Win10_1607 => "1607",
            Self::Win10_1703 => "1703",
            Self::Win10_1709 => "1709",
            Self::Win10_1803 => "1803",
            Self::Win10_1809 => "1809",
            Self::Win10_1903 => "1903",
            Self::Win10_2004 => "2004",
            Self::Win11_21H2 => "21h2",
            Self::Win11_23H2 => "23h2",
            Self::Win11_24H2 => "24h2",
        }
    }

    /// Does this release exist for `arch`?
    pub fn exists_for(self, arch: ArchKind) -> bool {
        match arch {
            ArchKind::X86 => true,
            ArchKind::X64 => self >= Self::FIRST_X64,
        }
    }

    /// Map the version numbers found in a PEB (`OSMajorVersion`,
    /// `OSMinorVersion`, `OSBuildNumber` and `OSCSDVersion`) to a release.
    ///
    /// The high byte of `OSCSDVersion` is the service pack major number, which
    /// is how the service pack variants get picked.
    pub fn from_os_version(major: u32, minor: u32, build: u16, csd_version: u16) -> Option<Self> {
        let service_pack = csd_version >> 8;
        let version = match (major, minor) {
            (3, 10) => Self::Nt310,
            (3, 50) => Self::Nt350,
            (3, 51) => Self::Nt351,
            (4, 0) => Self::Nt40,
            (5, 0) => Self::Nt50,
            (5, 1) if service_pack >= 2 => Self::Nt51Sp2,
            (5, 1) => Self::Nt51,
            (5, 2) if service_pack >= 1 => Self::Nt52Sp1,
            (5, 2) => Self::Nt52,
            (6, 0) if service_pack >= 1 => Self::Nt60Sp1,
            (6, 0) => Self::Nt60,
            (6, 1) => Self::Nt61,
            (6, 2) => Self::Nt62,
            (6, 3) => Self::Nt63,
            (10, 0) => match build {
                0..=10239 => return None,
                10240..=10585 => Self::Win10_1507,
                10586..=14392 => Self::Win10_1511,
                14393..=15062 => Self::Win10_1607,
                15063..=16298 => Self::Win10_1703,
                16299..=17133 => Self::Win10_1709,
                17134..=17762 => Self::Win10_1803,
                17763..=18361 => Self::Win10_1809,
                18362..=19040 => Self::Win10_1903,
                19041..=21999 => Self::Win10_2004,
                22000..=22630 => Self::Win11_21H2,
                22631..=26099 => Self::Win11_23H2,
                _ => Self::Win11_24H2,
            },
            _ => return None,
        };

        Some(version)
    }
}

impl Display for WinVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WinVersion {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.to_ascii_lowercase().replace([' ', '_', '-'], "");
        Self::ALL
            .into_iter()
            .find(|v| v.name().replace('.', "") == wanted.replace('.', ""))
            .ok_or_else(|| LayoutError::UnknownVersion(s.to_string()))
    }
}

/// An inclusive range of releases in which a member or a flag is valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VersionRange {
    pub since: WinVersion,
    /// `None` means the member is still around in the latest release.
    pub until: Option<WinVersion>,
}

impl VersionRange {
    pub const fn since(since: WinVersion) -> Self {
        Self { since, until: None }
    }

    pub const fn between(since: WinVersion, until: WinVersion) -> Self {
        Self {
            since,
            until: Some(until),
        }
    }

    pub const fn only(version: WinVersion) -> Self {
        Self::between(version, version)
    }

    pub fn contains(&self, version: WinVersion) -> bool {
        version >= self.since && self.until.map_or(true, |until| version <= until)
    }

    pub fn overlaps(&self, other: &VersionRange) -> bool {
        WinVersion::ALL
            .into_iter()
            .any(|v| self.contains(v) && other.contains(v))
    }
}

impl Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.until {
            None => write!(f, "{}+", self.since),
            Some(until) if until == self.since => write!(f, "{}", self.since),
            Some(until) => write!(f, "{}..={}", self.since, until),
        }
    }
}

/// An (address model, release) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayoutTarget {
    pub arch: ArchKind,
    pub version: WinVersion,
}

impl LayoutTarget {
    pub const fn new(arch: ArchKind, version: WinVersion) -> Self {
        Self { arch, version }
    }

    /// The most recent layout for the machine running this code.
    pub const fn native() -> Self {
        Self::new(ArchKind::native(), WinVersion::LATEST)
    }

    /// Every combination that actually shipped.
    pub fn all() -> impl Iterator<Item = LayoutTarget> {
        ArchKind::ALL.into_iter().flat_map(|arch| {
            WinVersion::ALL
                .into_iter()
                .filter(move |v| v.exists_for(arch))
                .map(move |version| LayoutTarget::new(arch, version))
        })
    }
}

impl Display for LayoutTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.arch, self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering() {
        assert!(WinVersion::ALL.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(WinVersion::ALL.last(), Some(&WinVersion::LATEST));
    }

    #[test]
    fn parse() {
        assert_eq!("6.1".parse::<WinVersion>().unwrap(), WinVersion::Nt61);
        assert_eq!("5.2 SP1".parse::<WinVersion>().unwrap(), WinVersion::Nt52Sp1);
        assert_eq!("21H2".parse::<WinVersion>().unwrap(), WinVersion::Win11_21H2);
        assert_eq!("23h2".parse::<WinVersion>().unwrap(), WinVersion::Win11_23H2);
        assert!("7.0".parse::<WinVersion>().is_err());
    }

    #[test]
    fn os_versions() {
        assert_eq!(
            WinVersion::from_os_version(5, 1, 2600, 0x0200),
            Some(WinVersion::Nt51Sp2)
        );
        assert_eq!(
            WinVersion::from_os_version(5, 1, 2600, 0x0100),
            Some(WinVersion::Nt51)
        );
        assert_eq!(
            WinVersion::from_os_version(6, 1, 7601, 0x0100),
            Some(WinVersion::Nt61)
        );
        assert_eq!(
            WinVersion::from_os_version(10, 0, 19045, 0),
            Some(WinVersion::Win10_2004)
        );
        assert_eq!(
            WinVersion::from_os_version(10, 0, 22000, 0),
            Some(WinVersion::Win11_21H2)
        );
        assert_eq!(
            WinVersion::from_os_version(10, 0, 22621, 0),
            Some(WinVersion::Win11_21H2)
        );
        assert_eq!(
            WinVersion::from_os_version(10, 0, 22631, 0),
            Some(WinVersion::Win11_23H2)
        );
        assert_eq!(
            WinVersion::from_os_version(10, 0, 26100, 0),
            Some(WinVersion::Win11_24H2)
        );
        assert_eq!(WinVersion::from_os_version(7, 0, 0, 0), None);
    }

    #[test]
    fn ranges() {
        let r = VersionRange::between(WinVersion::Nt60, WinVersion::Nt62);
        assert!(!r.contains(WinVersion::Nt52Sp1));
        assert!(r.contains(WinVersion::Nt60));
        assert!(r.contains(WinVersion::Nt62));
        assert!(!r.contains(WinVersion::Nt63));
        assert!(VersionRange::since(WinVersion::Nt63).contains(WinVersion::LATEST));
        assert!(!r.overlaps(&VersionRange::since(WinVersion::Nt63)));
        assert!(r.overlaps(&VersionRange::only(WinVersion::Nt62)));
    }

    #[test]
    fn targets() {
        assert!(LayoutTarget::all().all(|t| t.version.exists_for(t.arch)));
        assert!(!LayoutTarget::all()
            .any(|t| t.arch == ArchKind::X64 && t.version == WinVersion::Nt51));
    }
}
