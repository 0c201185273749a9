use tempera_embedded::Error;
use tempera_embedded::transport::{Access, Field, MemoryTransport, StoredValue};

/// Result of one visit of the access point.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReaderReport {
    pub values: Vec<(Field, StoredValue)>,
    pub acknowledged: Vec<Field>,
}

impl ReaderReport {
    pub fn value(&self, field: Field) -> Option<&StoredValue> {
        self.values
            .iter()
            .find_map(|(f, value)| (*f == field).then_some(value))
    }
}

/// Remote reader that periodically connects to the station, reads every
/// field and acknowledges what it consumed by writing `1` into each ack flag
/// that reads `0`.
#[derive(Debug, Default)]
pub struct AccessPoint {
    visits: u64,
}

impl AccessPoint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visits(&self) -> u64 {
        self.visits
    }

    pub fn visit(&mut self, transport: &mut MemoryTransport) -> Result<ReaderReport, Error> {
        let mut report = ReaderReport::default();

        for field in Field::ALL {
            match transport.remote_read(field) {
                Ok(value) => report.values.push((field, value)),
                Err(Error::UnknownField) => tracing::debug!("{} has no value yet", field),
                Err(e) => return Err(e),
            }
        }

        let pending: Vec<Field> = report
            .values
            .iter()
            .filter(|(field, value)| {
                field.access() == Access::ReadWrite && value.as_flag() == Some(false)
            })
            .map(|(field, _)| *field)
            .collect();

        for field in pending {
            transport.remote_write(field, true)?;
            report.acknowledged.push(field);
        }

        self.visits += 1;
        tracing::info!(
            "Reader visit #{}: {}",
            self.visits,
            report
                .values
                .iter()
                .filter_map(|(field, value)| value.as_text().map(|text| format!("{field}={text}")))
                .collect::<Vec<_>>()
                .join(", ")
        );

        Ok(report)
    }
}
