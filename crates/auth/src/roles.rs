//! Marketplace roles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The closed set of marketplace roles.
///
/// Roles are assigned externally (by the auth/data collaborator); this layer
/// only reads them and can request additions.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleName {
    Customer,
    Seller,
    DeliveryDriver,
}

impl RoleName {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleName::Customer => "customer",
            RoleName::Seller => "seller",
            RoleName::DeliveryDriver => "delivery_driver",
        }
    }

    /// Short label shown to users (e.g. "demander le rôle de vendeur").
    pub fn display_name(&self) -> &'static str {
        match self {
            RoleName::Customer => "client",
            RoleName::Seller => "vendeur",
            RoleName::DeliveryDriver => "livreur",
        }
    }

    /// One-sentence explanation of why the role is needed, shown on the
    /// access-denied panel.
    pub fn description(&self) -> &'static str {
        match self {
            RoleName::Customer => "Accès client requis pour cette fonctionnalité.",
            RoleName::Seller => {
                "Pour vendre vos produits sur Sookari, vous devez avoir le rôle de vendeur."
            }
            RoleName::DeliveryDriver => {
                "Pour effectuer des livraisons, vous devez avoir le rôle de livreur."
            }
        }
    }
}

impl core::fmt::Display for RoleName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A role granted to the current user, as resolved by the auth collaborator.
///
/// Inactive assignments are treated as absent for gating purposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignment {
    pub role: RoleName,
    pub is_active: bool,
    pub assigned_at: DateTime<Utc>,
}

impl RoleAssignment {
    pub fn active(role: RoleName, assigned_at: DateTime<Utc>) -> Self {
        Self {
            role,
            is_active: true,
            assigned_at,
        }
    }

    pub fn inactive(role: RoleName, assigned_at: DateTime<Utc>) -> Self {
        Self {
            role,
            is_active: false,
            assigned_at,
        }
    }
}

/// True iff `assignments` contains `required` with `is_active == true`.
pub fn has_role(assignments: &[RoleAssignment], required: RoleName) -> bool {
    assignments
        .iter()
        .any(|assignment| assignment.role == required && assignment.is_active)
}
