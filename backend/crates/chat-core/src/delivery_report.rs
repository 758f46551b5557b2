/// Outcome of dispatching one message.
///
/// Reports are consumed by logging and metrics only; they are never returned
/// to the submitter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Sinks that accepted the message
    pub delivered: usize,
    /// Sinks skipped because their buffer was full
    pub full: usize,
    /// Sinks skipped because their consumer went away
    pub closed: usize,
    /// Private message whose recipient is not registered
    pub unknown_recipient: bool,
}

impl DeliveryReport {
    pub fn unknown_recipient() -> Self {
        Self {
            unknown_recipient: true,
            ..Self::default()
        }
    }

    /// Number of intended recipients that did not get the message
    pub fn dropped(&self) -> usize {
        self.full + self.closed + usize::from(self.unknown_recipient)
    }
}
