/// Status of the real-time activity feed channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    /// No channel is open and no attempt is in flight.
    #[default]
    Disconnected,
    /// A connection attempt is in progress.
    Connecting,
    /// The channel is open and delivering events.
    Connected,
    /// No real connection succeeded; synthetic data is being shown.
    Degraded,
    /// The channel failed and no automatic recovery is scheduled.
    Error,
}

impl ConnectionStatus {
    /// Returns true while the channel is delivering live events.
    #[must_use]
    pub const fn is_connected(self) -> bool {
        matches!(self, Self::Connected)
    }

    /// Returns true if no successful connection is currently established.
    #[must_use]
    pub const fn is_offline(self) -> bool {
        !matches!(self, Self::Connected)
    }

    /// Status label matching the console's status indicator strings.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Degraded => "degraded",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
