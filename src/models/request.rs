use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum PricingModelError {
    #[error("Invalid pricing model: {0}")]
    InvalidModel(String),
}

#[derive(Debug, Error, PartialEq)]
pub enum CustomerTypeError {
    #[error("Invalid customer type: {0}")]
    InvalidType(String),
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PricingModel {
    #[default]
    #[serde(alias = "one-time", alias = "one_time_sell")]
    OneTime,
    Subscription,
}

impl PricingModel {
    pub fn label(&self) -> &'static str {
        match self {
            PricingModel::OneTime => "One-Time Sell",
            PricingModel::Subscription => "Subscription",
        }
    }
}

impl fmt::Display for PricingModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let model_str = match self {
            PricingModel::OneTime => "one-time",
            PricingModel::Subscription => "subscription",
        };
        write!(f, "{model_str}")
    }
}

impl FromStr for PricingModel {
    type Err = PricingModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "one-time" | "one_time" | "onetime" | "one-time sell" => Ok(PricingModel::OneTime),
            "subscription" => Ok(PricingModel::Subscription),
            other => Err(PricingModelError::InvalidModel(other.to_string())),
        }
    }
}

/// Partner is the preferential tier. Some price sheets call the same split
/// SI / Non-SI, which parses to the same variants.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CustomerType {
    #[serde(alias = "si", alias = "SI")]
    Partner,
    #[default]
    #[serde(alias = "non-partner", alias = "non_si", alias = "non-si", alias = "Non-SI")]
    NonPartner,
}

impl CustomerType {
    pub fn is_preferential(&self) -> bool {
        matches!(self, CustomerType::Partner)
    }

    pub fn label(&self) -> &'static str {
        match self {
            CustomerType::Partner => "Partner",
            CustomerType::NonPartner => "Non-Partner",
        }
    }
}

impl fmt::Display for CustomerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let type_str = match self {
            CustomerType::Partner => "partner",
            CustomerType::NonPartner => "non-partner",
        };
        write!(f, "{type_str}")
    }
}

impl FromStr for CustomerType {
    type Err = CustomerTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "partner" | "si" => Ok(CustomerType::Partner),
            "non-partner" | "non_partner" | "nonpartner" | "non-si" | "non_si" => {
                Ok(CustomerType::NonPartner)
            }
            other => Err(CustomerTypeError::InvalidType(other.to_string())),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PricingRequest {
    #[serde(default)]
    pub pricing_model: PricingModel,
    pub customer_type: CustomerType,
    pub total_cameras: u32,
    pub ai_enabled: bool,
    #[serde(default)]
    pub tier1_cameras: u32,
    #[serde(default)]
    pub tier2_cameras: u32,
    pub include_storage: bool,
    #[serde(default)]
    pub storage_tb_required: Option<u32>,
}

impl PricingRequest {
    /// Tier counts as the engine sees them; a disabled AI toggle zeroes both.
    pub fn ai_counts(&self) -> (u32, u32) {
        if self.ai_enabled {
            (self.tier1_cameras, self.tier2_cameras)
        } else {
            (0, 0)
        }
    }

    pub fn ai_cameras(&self) -> u64 {
        let (tier1, tier2) = self.ai_counts();
        tier1 as u64 + tier2 as u64
    }
}

impl Default for PricingRequest {
    fn default() -> Self {
        Self {
            pricing_model: PricingModel::OneTime,
            customer_type: CustomerType::Partner,
            total_cameras: 22,
            ai_enabled: true,
            tier1_cameras: 5,
            tier2_cameras: 7,
            include_storage: true,
            storage_tb_required: Some(8),
        }
    }
}
