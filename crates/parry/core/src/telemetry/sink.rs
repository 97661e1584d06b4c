use super::{TelemetryError, TimingSession};

/// Destination for finished timing records.
pub trait TelemetrySink {
    /// Persists one finished record.
    fn record(&mut self, session: &TimingSession) -> Result<(), TelemetryError>;
}

impl<S> TelemetrySink for &mut S
where
    S: TelemetrySink + ?Sized,
{
    fn record(&mut self, session: &TimingSession) -> Result<(), TelemetryError> {
        (**self).record(session)
    }
}

impl<S> TelemetrySink for Box<S>
where
    S: TelemetrySink + ?Sized,
{
    fn record(&mut self, session: &TimingSession) -> Result<(), TelemetryError> {
        (**self).record(session)
    }
}

/// Discards every record.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullTelemetry;

impl TelemetrySink for NullTelemetry {
    fn record(&mut self, _session: &TimingSession) -> Result<(), TelemetryError> {
        Ok(())
    }
}

/// Keeps records in memory, in resolution order.
#[derive(Clone, Debug, Default)]
pub struct MemoryTelemetry {
    records: Vec<TimingSession>,
}

impl MemoryTelemetry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[TimingSession] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last(&self) -> Option<&TimingSession> {
        self.records.last()
    }
}

impl TelemetrySink for MemoryTelemetry {
    fn record(&mut self, session: &TimingSession) -> Result<(), TelemetryError> {
        self.records.push(session.clone());
        Ok(())
    }
}
