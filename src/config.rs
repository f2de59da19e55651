use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    models::request::PricingModel,
    utils::{
        hardware::HardwareCapacity,
        storage::StorageUnit,
        tier::{Tier, TierTable, TierTableError},
    },
};

pub const DEFAULT_CONFIG_PATH: &str = "quote.toml";
pub const ENV_PREFIX: &str = "CAMQUOTE";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Configuration loading failed: {0}")]
    Load(#[from] ConfigError),

    #[error("Invalid {book} {table} tier table: {source}")]
    TierTable {
        book: &'static str,
        table: &'static str,
        #[source]
        source: TierTableError,
    },

    #[error("Fixed overflow pricing requires an overflow price for the {book} {table} table")]
    MissingOverflowPrice {
        book: &'static str,
        table: &'static str,
    },

    #[error("Hardware capacities must be positive, got {tier1}/{tier2}")]
    HardwareCapacity { tier1: u32, tier2: u32 },

    #[error("Storage catalog is empty")]
    EmptyStorageCatalog,

    #[error("Invalid storage unit {size_tb} TB at {price}")]
    StorageUnit { size_tb: u32, price: f64 },

    #[error("Duplicate storage unit size {0} TB")]
    DuplicateStorageUnit(u32),

    #[error("Invalid amount for {name}: {value}")]
    Amount { name: &'static str, value: f64 },

    #[error("Partner markup {partner} must not exceed non-partner markup {non_partner}")]
    MarkupOrder { partner: f64, non_partner: f64 },

    #[error("Escalation ceiling must be positive")]
    EscalationCeiling,
}

/// What happens when a quantity runs past the last tier of a price table.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Withhold totals and hand the request to sales.
    #[default]
    Escalate,
    /// Price the quantity at the table's `overflow_price`.
    FixedOverflowPrice,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StorageSelection {
    /// Greedy multi-unit cover of the requirement.
    #[default]
    BinPacked,
    /// One unit: the smallest size that holds the requirement.
    SingleTier,
}

/// Maintenance treatment under the subscription model.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MaintenancePolicy {
    #[default]
    Bundled,
    Charged,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceBook {
    pub base_license: f64,
    pub ai_base_license: f64,
    pub cameras: TierTable,
    pub tier1: TierTable,
    pub tier2: TierTable,
}

impl PriceBook {
    pub fn one_time() -> Self {
        Self {
            base_license: 45000.0,
            ai_base_license: 15000.0,
            cameras: TierTable::new(vec![
                Tier::new(10, 1800.0),
                Tier::new(30, 1600.0),
                Tier::new(50, 1500.0),
                Tier::new(100, 1300.0),
            ])
            .with_overflow_price(1200.0),
            tier1: TierTable::new(vec![Tier::new(50, 11000.0), Tier::new(100, 8000.0)])
                .with_overflow_price(7000.0),
            tier2: TierTable::new(vec![Tier::new(50, 5600.0), Tier::new(100, 4500.0)])
                .with_overflow_price(4000.0),
        }
    }

    pub fn subscription() -> Self {
        Self {
            base_license: 15000.0,
            ai_base_license: 5000.0,
            cameras: TierTable::new(vec![
                Tier::new(10, 600.0),
                Tier::new(30, 550.0),
                Tier::new(50, 500.0),
                Tier::new(100, 450.0),
            ])
            .with_overflow_price(400.0),
            tier1: TierTable::new(vec![Tier::new(50, 3600.0), Tier::new(100, 2800.0)])
                .with_overflow_price(2500.0),
            tier2: TierTable::new(vec![Tier::new(50, 1900.0), Tier::new(100, 1500.0)])
                .with_overflow_price(1300.0),
        }
    }

    fn tables(&self) -> [(&'static str, &TierTable); 3] {
        [
            ("cameras", &self.cameras),
            ("tier1", &self.tier1),
            ("tier2", &self.tier2),
        ]
    }

    fn validate(&self, book: &'static str, overflow: OverflowPolicy) -> Result<(), SettingsError> {
        check_amount("base_license", self.base_license)?;
        check_amount("ai_base_license", self.ai_base_license)?;

        for (table_name, table) in self.tables() {
            table
                .validate()
                .map_err(|source| SettingsError::TierTable {
                    book,
                    table: table_name,
                    source,
                })?;

            if overflow == OverflowPolicy::FixedOverflowPrice && table.overflow_price.is_none() {
                return Err(SettingsError::MissingOverflowPrice {
                    book,
                    table: table_name,
                });
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HardwareSettings {
    pub base_price: f64,
    pub tier1_capacity: u32,
    pub tier2_capacity: u32,
}

impl HardwareSettings {
    pub fn capacity(&self) -> HardwareCapacity {
        HardwareCapacity::new(self.tier1_capacity, self.tier2_capacity)
    }
}

impl Default for HardwareSettings {
    fn default() -> Self {
        Self {
            base_price: 65000.0,
            tier1_capacity: 10,
            tier2_capacity: 14,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageSettings {
    pub units: Vec<StorageUnit>,
}

impl StorageSettings {
    pub fn sizes(&self) -> Vec<u32> {
        self.units.iter().map(|u| u.size_tb).collect()
    }

    pub fn price_of(&self, size_tb: u32) -> Option<f64> {
        self.units
            .iter()
            .find(|u| u.size_tb == size_tb)
            .map(|u| u.price)
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            units: vec![
                StorageUnit::new(1, 1670.0),
                StorageUnit::new(2, 2030.0),
                StorageUnit::new(4, 2930.0),
                StorageUnit::new(6, 4990.0),
                StorageUnit::new(8, 6890.0),
                StorageUnit::new(10, 10990.0),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RateSettings {
    pub partner_markup: f64,
    pub non_partner_markup: f64,
    pub partner_discount: f64,
    pub maintenance: f64,
}

impl Default for RateSettings {
    fn default() -> Self {
        Self {
            partner_markup: 0.20,
            non_partner_markup: 0.30,
            partner_discount: 0.20,
            maintenance: 0.20,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PolicySettings {
    pub overflow: OverflowPolicy,
    pub escalation_ceiling: u32,
    pub storage: StorageSelection,
    pub subscription_maintenance: MaintenancePolicy,
}

impl Default for PolicySettings {
    fn default() -> Self {
        Self {
            overflow: OverflowPolicy::Escalate,
            escalation_ceiling: 100,
            storage: StorageSelection::BinPacked,
            subscription_maintenance: MaintenancePolicy::Bundled,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExportSettings {
    pub directory: PathBuf,
    pub currency: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            currency: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub one_time: PriceBook,
    pub subscription: PriceBook,
    pub hardware: HardwareSettings,
    pub storage: StorageSettings,
    pub rates: RateSettings,
    pub policy: PolicySettings,
    pub export: ExportSettings,
}

impl Settings {
    pub fn load(config_path: &Option<String>) -> Result<Self, SettingsError> {
        let settings = match Self::load_from_file(config_path) {
            Ok(settings) => settings,
            Err(err) if config_path.is_none() => {
                warn!("Could not read config file: {err}. Using default configuration.",);
                Self::default()
            }
            Err(err) => return Err(err),
        };

        settings.validate()?;
        debug!("Pricing settings loaded: {:?}", settings.policy);

        Ok(settings)
    }

    fn load_from_file(config_path: &Option<String>) -> Result<Self, SettingsError> {
        let path = config_path.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);

        let config = Config::builder()
            .add_source(File::with_name(path).required(config_path.is_some()))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Settings>()?;

        Ok(config)
    }

    pub fn price_book(&self, model: PricingModel) -> &PriceBook {
        match model {
            PricingModel::OneTime => &self.one_time,
            PricingModel::Subscription => &self.subscription,
        }
    }

    /// Checks the invariants the engine relies on so that no pricing call has
    /// to guard against a bad table or a zero capacity.
    pub fn validate(&self) -> Result<(), SettingsError> {
        self.one_time.validate("one_time", self.policy.overflow)?;
        self.subscription
            .validate("subscription", self.policy.overflow)?;

        let capacity = self.hardware.capacity();
        if !capacity.is_valid() {
            return Err(SettingsError::HardwareCapacity {
                tier1: capacity.tier1,
                tier2: capacity.tier2,
            });
        }
        check_amount("hardware.base_price", self.hardware.base_price)?;

        if self.storage.units.is_empty() {
            return Err(SettingsError::EmptyStorageCatalog);
        }
        for (i, unit) in self.storage.units.iter().enumerate() {
            if unit.size_tb == 0 || !unit.price.is_finite() || unit.price < 0.0 {
                return Err(SettingsError::StorageUnit {
                    size_tb: unit.size_tb,
                    price: unit.price,
                });
            }
            if self.storage.units[..i]
                .iter()
                .any(|u| u.size_tb == unit.size_tb)
            {
                return Err(SettingsError::DuplicateStorageUnit(unit.size_tb));
            }
        }

        check_amount("rates.partner_markup", self.rates.partner_markup)?;
        check_amount("rates.non_partner_markup", self.rates.non_partner_markup)?;
        if self.rates.partner_markup > self.rates.non_partner_markup {
            return Err(SettingsError::MarkupOrder {
                partner: self.rates.partner_markup,
                non_partner: self.rates.non_partner_markup,
            });
        }
        check_amount("rates.maintenance", self.rates.maintenance)?;
        check_amount("rates.partner_discount", self.rates.partner_discount)?;
        if self.rates.partner_discount > 1.0 {
            return Err(SettingsError::Amount {
                name: "rates.partner_discount",
                value: self.rates.partner_discount,
            });
        }

        if self.policy.escalation_ceiling == 0 {
            return Err(SettingsError::EscalationCeiling);
        }

        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            one_time: PriceBook::one_time(),
            subscription: PriceBook::subscription(),
            hardware: HardwareSettings::default(),
            storage: StorageSettings::default(),
            rates: RateSettings::default(),
            policy: PolicySettings::default(),
            export: ExportSettings::default(),
        }
    }
}

fn check_amount(name: &'static str, value: f64) -> Result<(), SettingsError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SettingsError::Amount { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let mut settings = Settings::default();
        settings.hardware.tier2_capacity = 0;
        let err = settings.validate().unwrap_err();
        assert!(matches!(
            err,
            SettingsError::HardwareCapacity { tier1: 10, tier2: 0 }
        ));
    }

    #[test]
    fn fixed_overflow_requires_overflow_prices() {
        let mut settings = Settings::default();
        settings.policy.overflow = OverflowPolicy::FixedOverflowPrice;
        assert!(settings.validate().is_ok());

        settings.subscription.tier2.overflow_price = None;
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("subscription tier2"));
    }

    #[test]
    fn unordered_tier_table_is_rejected() {
        let mut settings = Settings::default();
        settings.one_time.cameras.tiers.swap(0, 1);
        let err = settings.validate().unwrap_err();
        assert!(matches!(
            err,
            SettingsError::TierTable {
                book: "one_time",
                table: "cameras",
                ..
            }
        ));
    }

    #[test]
    fn swapped_markups_are_rejected() {
        let mut settings = Settings::default();
        settings.rates.partner_markup = 0.30;
        settings.rates.non_partner_markup = 0.20;
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::MarkupOrder { .. })
        ));

        settings.rates.partner_markup = 0.20;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn storage_catalog_must_be_usable() {
        let mut settings = Settings::default();
        settings.storage.units.push(StorageUnit::new(4, 100.0));
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::DuplicateStorageUnit(4))
        ));

        settings.storage.units.clear();
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::EmptyStorageCatalog)
        ));
    }

    #[test]
    fn partial_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[rates]
partner_markup = 0.25

[policy]
overflow = "fixed_overflow_price"
storage = "single_tier"
"#
        )
        .unwrap();

        let path = file.path().to_string_lossy().to_string();
        let settings = Settings::load(&Some(path)).unwrap();

        assert_eq!(settings.rates.partner_markup, 0.25);
        assert_eq!(settings.rates.non_partner_markup, 0.30);
        assert_eq!(settings.policy.overflow, OverflowPolicy::FixedOverflowPrice);
        assert_eq!(settings.policy.storage, StorageSelection::SingleTier);
        assert_eq!(settings.policy.escalation_ceiling, 100);
        assert_eq!(settings.one_time, PriceBook::one_time());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let missing = Some("/nonexistent/camquote/quote.toml".to_string());
        assert!(matches!(
            Settings::load(&missing),
            Err(SettingsError::Load(_))
        ));
    }
}
