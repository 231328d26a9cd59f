use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use thiserror::Error;

/// A store kind value outside the persisted set.
///
/// Produced wherever untrusted integers enter the system (job payloads,
/// database columns); the enum itself is closed, so code holding a
/// [`StoreKind`] never has to re-validate it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown store kind: {0}")]
pub struct UnknownStoreKind(pub i16);

/// Which backend currently holds an upload's content.
///
/// Persisted as a smallint column: 1 = local filesystem, 2 = remote object
/// store. The `(store, path)` pair on an upload row is only ever updated
/// together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[repr(i16)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    Local = 1,
    Remote = 2,
}

impl StoreKind {
    pub fn as_i16(self) -> i16 {
        self as i16
    }
}

impl TryFrom<i16> for StoreKind {
    type Error = UnknownStoreKind;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(StoreKind::Local),
            2 => Ok(StoreKind::Remote),
            other => Err(UnknownStoreKind(other)),
        }
    }
}

impl FromStr for StoreKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(StoreKind::Local),
            "remote" => Ok(StoreKind::Remote),
            _ => Err(anyhow::anyhow!("Invalid store kind: {}", s)),
        }
    }
}

impl Display for StoreKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            StoreKind::Local => write!(f, "local"),
            StoreKind::Remote => write!(f, "remote"),
        }
    }
}
