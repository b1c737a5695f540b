//! Supported remote trackers.

use super::IntegrationDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Remote system an integration pulls from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RemoteSystem {
    /// GitHub Projects (v2) items.
    #[serde(rename = "github")]
    GitHub,
    /// Azure DevOps work items.
    #[serde(rename = "azure_devops")]
    AzureDevOps,
}

impl RemoteSystem {
    /// Returns the system name in canonical storage format.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GitHub => "github",
            Self::AzureDevOps => "azure_devops",
        }
    }
}

impl TryFrom<&str> for RemoteSystem {
    type Error = IntegrationDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "github" => Ok(Self::GitHub),
            "azure_devops" | "azuredevops" | "azure-devops" => Ok(Self::AzureDevOps),
            _ => Err(IntegrationDomainError::InvalidRemoteSystem(value.to_owned())),
        }
    }
}

impl fmt::Display for RemoteSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
