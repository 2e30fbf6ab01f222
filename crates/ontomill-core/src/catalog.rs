//! URI minting for manufacturing entities.
//!
//! Resources created through the engine get compact URIs of the form
//! `<prefix>:<EntityPrefix>_<key>`. Kinds recorded many times under the same
//! key (quality checks, maintenance events) get a
//! `_<YYYYmmdd_HHMMSS_ffffff>_<nonce>` suffix so two records minted in the
//! same instant still get distinct URIs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CatalogError;

/// Default catalog prefix.
pub const DEFAULT_PREFIX: &str = "ex";

/// Entity kinds the catalog knows how to name.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum EntityKind {
    WorkOrder,
    QualityControl,
    Equipment,
    Product,
    Maintenance,
    ProcessFlow,
}

impl EntityKind {
    /// Short prefix used in minted URIs.
    pub fn entity_prefix(self) -> &'static str {
        match self {
            Self::WorkOrder => "WO",
            Self::QualityControl => "QC",
            Self::Equipment => "EQ",
            Self::Product => "PRD",
            Self::Maintenance => "MT",
            Self::ProcessFlow => "PF",
        }
    }

    /// Graph label for nodes of this kind.
    pub fn label(self) -> &'static str {
        match self {
            Self::WorkOrder => "WorkOrder",
            Self::QualityControl => "QualityControl",
            Self::Equipment => "Equipment",
            Self::Product => "Product",
            Self::Maintenance => "Maintenance",
            Self::ProcessFlow => "ProcessFlow",
        }
    }

    /// Whether URIs of this kind carry a timestamp suffix.
    pub fn is_timestamped(self) -> bool {
        matches!(self, Self::QualityControl | Self::Maintenance)
    }
}

/// Naming policy for minted resource URIs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    prefix: String,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }
}

impl Catalog {
    pub fn new(prefix: &str) -> Result<Self, CatalogError> {
        let valid = !prefix.is_empty()
            && prefix
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(CatalogError::InvalidPrefix(prefix.to_string()));
        }
        Ok(Self {
            prefix: prefix.to_string(),
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Mint a URI. Timestamped kinds get the current time plus a random
    /// nonce; other kinds are deterministic in `key`.
    pub fn mint(&self, kind: EntityKind, key: &str) -> Result<String, CatalogError> {
        let uri = self.mint_at(kind, key, Utc::now())?;
        if kind.is_timestamped() {
            let nonce = Uuid::new_v4().simple().to_string();
            Ok(format!("{uri}_{}", &nonce[..8]))
        } else {
            Ok(uri)
        }
    }

    /// Mint a URI with an explicit instant and no nonce.
    /// Deterministic kinds ignore `at`.
    pub fn mint_at(
        &self,
        kind: EntityKind,
        key: &str,
        at: DateTime<Utc>,
    ) -> Result<String, CatalogError> {
        let key = sanitize_key(key);
        if key.is_empty() {
            return Err(CatalogError::EmptyKey {
                kind: kind.label().to_string(),
            });
        }

        let base = format!("{}:{}_{}", self.prefix, kind.entity_prefix(), key);
        if kind.is_timestamped() {
            Ok(format!("{base}_{}", at.format("%Y%m%d_%H%M%S_%6f")))
        } else {
            Ok(base)
        }
    }
}

fn sanitize_key(key: &str) -> String {
    key.split_whitespace().collect::<Vec<_>>().join("_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_work_order_uri_is_deterministic() {
        let c = Catalog::default();
        assert_eq!(c.mint(EntityKind::WorkOrder, "1001").unwrap(), "ex:WO_1001");
        assert_eq!(
            c.mint(EntityKind::WorkOrder, "1001").unwrap(),
            c.mint(EntityKind::WorkOrder, "1001").unwrap()
        );
    }

    #[test]
    fn test_quality_uri_is_timestamped() {
        let c = Catalog::default();
        let t1 = Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap();
        let t2 = Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 10).unwrap();
        let a = c.mint_at(EntityKind::QualityControl, "PRD42", t1).unwrap();
        let b = c.mint_at(EntityKind::QualityControl, "PRD42", t2).unwrap();
        assert_eq!(a, "ex:QC_PRD42_20240305_140709_000000");
        assert_ne!(a, b);
    }

    #[test]
    fn test_timestamp_keeps_sub_second_precision() {
        let c = Catalog::default();
        let at = Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap()
            + chrono::Duration::microseconds(250);
        assert_eq!(
            c.mint_at(EntityKind::Maintenance, "EQ7", at).unwrap(),
            "ex:MT_EQ7_20240305_140709_000250"
        );
    }

    #[test]
    fn test_back_to_back_quality_uris_differ() {
        let c = Catalog::default();
        let a = c.mint(EntityKind::QualityControl, "PRD42").unwrap();
        let b = c.mint(EntityKind::QualityControl, "PRD42").unwrap();
        assert_ne!(a, b);
        assert!(a.starts_with("ex:QC_PRD42_"));
    }

    #[test]
    fn test_key_whitespace_is_normalized() {
        let c = Catalog::new("mfg").unwrap();
        assert_eq!(
            c.mint(EntityKind::Equipment, "  press  line 2 ").unwrap(),
            "mfg:EQ_press_line_2"
        );
    }

    #[test]
    fn test_empty_key_rejected() {
        let err = Catalog::default()
            .mint(EntityKind::Product, "   ")
            .unwrap_err();
        assert_eq!(
            err,
            CatalogError::EmptyKey {
                kind: "Product".to_string()
            }
        );
    }

    #[test]
    fn test_invalid_prefix_rejected() {
        assert!(Catalog::new("").is_err());
        assert!(Catalog::new("ex:").is_err());
        assert!(Catalog::new("my-ns").is_ok());
    }
}
