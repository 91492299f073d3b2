use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, PoisonError};
use sumerplus::config::StatementConfig;
use sumerplus::workflows::questionnaire::{Notification, Notifier, NotifyError};
use sumerplus::workflows::settlement::{normalize_unit, DriverRate, RateBook, RateBookError};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Shared collaborators for the settlement routes.
#[derive(Clone)]
pub(crate) struct SettlementState {
    pub(crate) rate_book: Arc<InMemoryRateBook>,
    pub(crate) config: StatementConfig,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryRateBook {
    entries: Arc<Mutex<BTreeMap<String, DriverRate>>>,
}

impl InMemoryRateBook {
    /// Stores the rate under its normalized unit number, replacing any earlier entry.
    pub(crate) fn save(&self, mut rate: DriverRate) -> Result<DriverRate, RateBookError> {
        let unit = normalize_unit(&rate.unit_number)
            .ok_or_else(|| RateBookError::InvalidUnit(rate.unit_number.clone()))?;
        rate.unit_number = unit.clone();
        let mut guard = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        guard.insert(unit, rate.clone());
        Ok(rate)
    }

    pub(crate) fn entries(&self) -> Vec<DriverRate> {
        let guard = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        guard.values().cloned().collect()
    }
}

impl RateBook for InMemoryRateBook {
    fn rate_for(&self, unit: &str) -> Result<Option<DriverRate>, RateBookError> {
        let guard = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(guard.get(unit).cloned())
    }
}

/// Keeps outgoing questionnaire notifications in memory and logs each one. Delivery to a real
/// mailbox is handled outside this service.
#[derive(Default, Clone)]
pub(crate) struct InMemoryOutbox {
    sent: Arc<Mutex<Vec<Notification>>>,
}

impl Notifier for InMemoryOutbox {
    fn notify(&self, notification: Notification) -> Result<(), NotifyError> {
        info!(
            subject = %notification.subject,
            attachment = %notification.attachment_name,
            bytes = notification.attachment.len(),
            "questionnaire notification queued"
        );
        let mut guard = self.sent.lock().unwrap_or_else(PoisonError::into_inner);
        guard.push(notification);
        Ok(())
    }
}

#[cfg(test)]
impl InMemoryOutbox {
    pub(crate) fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn deserialize_optional_date<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.map(|value| parse_date(&value).map_err(serde::de::Error::custom))
        .transpose()
}

/// Reads a CLI value through the same wire names the JSON API accepts, e.g. `"1001-2000"`.
pub(crate) fn parse_wire<T>(raw: &str) -> Result<T, String>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_value(serde_json::Value::String(raw.trim().to_string()))
        .map_err(|err| format!("unrecognized value '{raw}' ({err})"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn rate_book_keeps_serving_after_a_writer_panics() {
        let book = InMemoryRateBook::default();
        let entries = book.entries.clone();
        let _ = std::thread::spawn(move || {
            let _guard = entries.lock().unwrap_or_else(PoisonError::into_inner);
            panic!("writer failed while holding the lock");
        })
        .join();
        assert!(book.entries.is_poisoned());

        let saved = book
            .save(DriverRate {
                unit_number: "012".to_string(),
                driver_name: "Ana Ruiz".to_string(),
                driver_email: None,
                company: None,
                rate_per_mile: Decimal::new(70, 2),
            })
            .expect("save succeeds");
        assert_eq!(saved.unit_number, "12");
        let found = book.rate_for("12").expect("lookup succeeds");
        assert_eq!(found.map(|rate| rate.driver_name).as_deref(), Some("Ana Ruiz"));
        assert_eq!(book.entries().len(), 1);
    }
}
