use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::backend::KeyValueBackend;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSourceKind {
    Local,
    Remote,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Unattempted,
    Connected,
    /// The remote was configured but unusable; reads and writes go to the
    /// local backend for the rest of the session.
    Degraded { reason: String },
}

/// Chooses between the hosted backend and on-device storage.
///
/// A single connection attempt is made, either explicitly through
/// [`DataSource::connect`] or lazily on first use. There is no retry.
pub struct DataSource {
    kind: DataSourceKind,
    state: ConnectionState,
    remote: Option<Box<dyn KeyValueBackend>>,
    local: Box<dyn KeyValueBackend>,
}

impl DataSource {
    pub fn local(backend: impl KeyValueBackend + 'static) -> Self {
        Self {
            kind: DataSourceKind::Local,
            state: ConnectionState::Unattempted,
            remote: None,
            local: Box::new(backend),
        }
    }

    pub fn remote(
        remote: Option<Box<dyn KeyValueBackend>>,
        fallback: impl KeyValueBackend + 'static,
    ) -> Self {
        Self {
            kind: DataSourceKind::Remote,
            state: ConnectionState::Unattempted,
            remote,
            local: Box::new(fallback),
        }
    }

    /// Builds a source for the configured kind. A remote kind without a
    /// client degrades on connect.
    pub fn for_kind(
        kind: DataSourceKind,
        remote: Option<Box<dyn KeyValueBackend>>,
        local: impl KeyValueBackend + 'static,
    ) -> Self {
        match kind {
            DataSourceKind::Local => Self::local(local),
            DataSourceKind::Remote => Self::remote(remote, local),
        }
    }

    pub fn kind(&self) -> DataSourceKind {
        self.kind
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self.state, ConnectionState::Degraded { .. })
    }

    pub fn connect(&mut self) -> &ConnectionState {
        if self.state != ConnectionState::Unattempted {
            return &self.state;
        }
        self.state = match self.kind {
            DataSourceKind::Local => ConnectionState::Connected,
            DataSourceKind::Remote => match &self.remote {
                None => ConnectionState::Degraded {
                    reason: "no remote client configured".to_string(),
                },
                Some(remote) => match remote.probe() {
                    Ok(()) => ConnectionState::Connected,
                    Err(err) => ConnectionState::Degraded {
                        reason: err.to_string(),
                    },
                },
            },
        };
        match &self.state {
            ConnectionState::Degraded { reason } => {
                warn!(%reason, fallback = %self.local.describe(), "remote data source unavailable, using local storage");
            }
            _ => {
                info!(backend = %self.active_ref().describe(), "data source connected");
            }
        }
        &self.state
    }

    /// The backend that currently serves reads and writes.
    pub fn active(&mut self) -> &dyn KeyValueBackend {
        self.connect();
        self.active_ref()
    }

    fn active_ref(&self) -> &dyn KeyValueBackend {
        match (&self.state, self.kind, &self.remote) {
            (ConnectionState::Connected, DataSourceKind::Remote, Some(remote)) => &**remote,
            _ => &*self.local,
        }
    }
}

impl FromStr for DataSourceKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "local" => Ok(DataSourceKind::Local),
            "remote" => Ok(DataSourceKind::Remote),
            _ => Err(format!("unknown data source: {value}")),
        }
    }
}

impl fmt::Display for DataSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            DataSourceKind::Local => "local",
            DataSourceKind::Remote => "remote",
        };
        write!(f, "{value}")
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionState::Unattempted => write!(f, "unattempted"),
            ConnectionState::Connected => write!(f, "connected"),
            ConnectionState::Degraded { reason } => write!(f, "degraded ({reason})"),
        }
    }
}
