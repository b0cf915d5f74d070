//! Persisted monotonic counters behind the human-readable identifiers.
//!
//! Every entity type gets ids of the form `<PREFIX><zero-padded number>`
//! (`REQ0000001`, `BUD0000001`, `DPT001`, ...). The counter row is the
//! source of truth; when it is missing (a database predating the counters),
//! it is seeded from the largest numeric suffix already stored for that
//! entity, so generated ids keep extending existing data.

use sea_orm::{ActiveValue, entity::prelude::*};

/// Entity types with generated sequential identifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdKind {
    Department,
    Vendor,
    Product,
    Official,
    Request,
    BudgetLog,
}

impl IdKind {
    /// Key of the counter row in the `sequences` table.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Department => "department",
            Self::Vendor => "vendor",
            Self::Product => "product",
            Self::Official => "official",
            Self::Request => "request",
            Self::BudgetLog => "budget_log",
        }
    }

    pub fn prefix(self) -> &'static str {
        match self {
            Self::Department => "DPT",
            Self::Vendor => "VEN",
            Self::Product => "PRO",
            Self::Official => "DEF",
            Self::Request => "REQ",
            Self::BudgetLog => "BUD",
        }
    }

    pub fn width(self) -> usize {
        match self {
            Self::Department | Self::Vendor | Self::Official => 3,
            Self::Product => 4,
            Self::Request | Self::BudgetLog => 7,
        }
    }

    /// Table scanned when seeding a missing counter from legacy rows.
    pub fn table(self) -> &'static str {
        match self {
            Self::Department => "departments",
            Self::Vendor => "vendors",
            Self::Product => "products",
            Self::Official => "officials",
            Self::Request => "procurement_requests",
            Self::BudgetLog => "budget_log",
        }
    }

    /// Renders the nth identifier of this kind.
    ///
    /// The width is a minimum: a counter that outgrows its padding keeps
    /// producing valid (longer) ids.
    #[must_use]
    pub fn render(self, value: i64) -> String {
        format!("{}{:0width$}", self.prefix(), value, width = self.width())
    }

    /// Extracts the numeric suffix of an identifier of this kind.
    ///
    /// Returns `None` for ids with a different prefix or a non-numeric
    /// suffix; seeding skips those rather than failing.
    #[must_use]
    pub fn parse_suffix(self, id: &str) -> Option<i64> {
        let suffix = id.strip_prefix(self.prefix())?;
        if suffix.is_empty() || !suffix.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        suffix.parse().ok()
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "sequences")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub kind: String,
    pub last_value: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn active(kind: IdKind, last_value: i64) -> ActiveModel {
        ActiveModel {
            kind: ActiveValue::Set(kind.as_str().to_string()),
            last_value: ActiveValue::Set(last_value),
        }
    }
}
