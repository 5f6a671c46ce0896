//! Community flag records.

use serde::{Deserialize, Serialize};

use crate::error::UnknownTag;
use crate::types::id::MemberId;

/// Why a community member reported a post.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FlagReason {
    Spam,
    Harassment,
    PersonalInformation,
    Inappropriate,
    OffTopic,
}

impl std::fmt::Display for FlagReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FlagReason::Spam => write!(f, "spam"),
            FlagReason::Harassment => write!(f, "harassment"),
            FlagReason::PersonalInformation => write!(f, "personal_information"),
            FlagReason::Inappropriate => write!(f, "inappropriate"),
            FlagReason::OffTopic => write!(f, "off_topic"),
        }
    }
}

impl std::str::FromStr for FlagReason {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "spam" => Ok(FlagReason::Spam),
            "harassment" => Ok(FlagReason::Harassment),
            "personal_information" => Ok(FlagReason::PersonalInformation),
            "inappropriate" => Ok(FlagReason::Inappropriate),
            "off_topic" => Ok(FlagReason::OffTopic),
            _ => Err(UnknownTag(s.to_string())),
        }
    }
}

/// Who filed a flag.
///
/// Flags are deduplicated per identity per post, so the identity must be
/// stable across repeat reports. Anonymous reporters are identified by an
/// opaque caller-derived key (e.g. a hashed network address); raw addresses
/// never reach this library.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ReporterIdentity {
    Member(MemberId),
    Anonymous(String),
}

impl std::fmt::Display for ReporterIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReporterIdentity::Member(id) => write!(f, "member:{}", id),
            ReporterIdentity::Anonymous(key) => write!(f, "anon:{}", key),
        }
    }
}

/// One open flag against a post.
///
/// At most one exists per reporter per post; a repeat report from the same
/// identity replaces the reason instead of adding a second record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Flag {
    pub reporter: ReporterIdentity,
    pub reason: FlagReason,
}
