//! Scenario Cases
//!
//! A happy-path request tuple: which token pair to move between which chains
//! and for how much. Construction enforces the catalog invariants so a
//! malformed case can never reach a request builder.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::amount::Amount;
use super::chain::ChainId;
use super::fixtures::FixtureError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferType {
    Swap,
    Bridge,
}

impl fmt::Display for TransferType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferType::Swap => f.write_str("swap"),
            TransferType::Bridge => f.write_str("bridge"),
        }
    }
}

/// Selection tags used to filter suite runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    Smoke,
    Regression,
    Swap,
    Bridge,
    Negative,
}

impl Tag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Smoke => "smoke",
            Tag::Regression => "regression",
            Tag::Swap => "swap",
            Tag::Bridge => "bridge",
            Tag::Negative => "negative",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.as_str())
    }
}

impl std::str::FromStr for Tag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim_start_matches('@').to_ascii_lowercase().as_str() {
            "smoke" => Ok(Tag::Smoke),
            "regression" => Ok(Tag::Regression),
            "swap" => Ok(Tag::Swap),
            "bridge" => Ok(Tag::Bridge),
            "negative" => Ok(Tag::Negative),
            other => Err(format!("unknown tag '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioCase {
    pub name: String,
    pub from_chain: ChainId,
    pub to_chain: ChainId,
    /// Symbol or address
    pub from_token: String,
    pub to_token: String,
    /// Decimal string, smallest unit
    pub from_amount: String,
    pub transfer_type: TransferType,
    pub tags: BTreeSet<Tag>,
}

impl ScenarioCase {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<String>,
        from_chain: ChainId,
        to_chain: ChainId,
        from_token: impl Into<String>,
        to_token: impl Into<String>,
        from_amount: impl Into<String>,
        transfer_type: TransferType,
        tags: impl IntoIterator<Item = Tag>,
    ) -> Result<Self, FixtureError> {
        let case = Self {
            name: name.into(),
            from_chain,
            to_chain,
            from_token: from_token.into(),
            to_token: to_token.into(),
            from_amount: from_amount.into(),
            transfer_type,
            tags: tags.into_iter().collect(),
        };
        case.validate()?;
        Ok(case)
    }

    fn validate(&self) -> Result<(), FixtureError> {
        let amount = Amount::parse(&self.from_amount).map_err(|source| FixtureError::InvalidAmount {
            name: self.name.clone(),
            source,
        })?;
        if amount.is_zero() {
            return Err(self.invalid("fromAmount must be positive"));
        }

        if self.transfer_type == TransferType::Swap {
            if self.from_chain != self.to_chain {
                return Err(self.invalid("swap must stay on one chain"));
            }
            if self.from_token.eq_ignore_ascii_case(&self.to_token) {
                return Err(self.invalid("swap must change token"));
            }
        }
        Ok(())
    }

    fn invalid(&self, reason: &str) -> FixtureError {
        FixtureError::InvalidScenario {
            name: self.name.clone(),
            reason: reason.to_string(),
        }
    }

    pub fn has_tag(&self, tag: Tag) -> bool {
        self.tags.contains(&tag)
    }

    pub fn is_cross_chain(&self) -> bool {
        self.from_chain != self.to_chain
    }

    /// Name prefixed with its tags, e.g. `@smoke @bridge USDC Ethereum -> Polygon`
    pub fn display_name(&self) -> String {
        let mut out = String::new();
        for tag in &self.tags {
            out.push_str(&tag.to_string());
            out.push(' ');
        }
        out.push_str(&self.name);
        out
    }
}
