//! The probing round.

use std::sync::Arc;

use crate::config::MonitoringConfig;
use crate::ingest::RemoteForwarder;
use crate::model::Observation;
use crate::monitor::{ObservationBuilder, StatusFileWriter};
use crate::probe::ServiceProber;
use crate::store::StatusStore;

/// Runs one batch round: probe every configured service, record each
/// observation, then derive and record the application observation.
///
/// Sinks are wired per deployment: a co-located monitor records into the
/// status store; a disconnected one writes files and uploads to a remote
/// ingest endpoint. Any combination works.
pub struct Aggregator {
    prober: ServiceProber,
    builder: ObservationBuilder,
    services: Vec<String>,
    application_name: String,
    store: Option<Arc<StatusStore>>,
    writer: Option<StatusFileWriter>,
    forwarder: Option<RemoteForwarder>,
}

impl Aggregator {
    pub fn new(
        prober: ServiceProber,
        builder: ObservationBuilder,
        config: &MonitoringConfig,
    ) -> Self {
        Self {
            prober,
            builder,
            services: config.services.clone(),
            application_name: config.application_name.clone(),
            store: None,
            writer: None,
            forwarder: None,
        }
    }

    pub fn with_store(mut self, store: Arc<StatusStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_writer(mut self, writer: StatusFileWriter) -> Self {
        self.writer = Some(writer);
        self
    }

    pub fn with_forwarder(mut self, forwarder: RemoteForwarder) -> Self {
        self.forwarder = Some(forwarder);
        self
    }

    /// Probe, build and record every service sequentially, then the
    /// derived application record. Returns the full round, services first,
    /// application last. No retries: a failed probe is a DOWN observation,
    /// which is a valid, recorded fact.
    pub async fn run_round(&self) -> Vec<Observation> {
        let mut dependents = Vec::with_capacity(self.services.len());
        let mut round = Vec::with_capacity(self.services.len() + 1);

        for service in &self.services {
            let status = self.prober.probe(service).await;
            tracing::debug!(service = %service, status = %status, "Probed service");

            let observation = self.builder.service(service, status);
            let record = Observation::from(observation.clone());
            self.record(&record).await;

            dependents.push(observation);
            round.push(record);
        }

        let application = self
            .builder
            .application(&self.application_name, dependents);
        let record = Observation::from(application);
        self.record(&record).await;
        round.push(record);

        round
    }

    /// Fan one observation out to every wired sink. Sink failures are
    /// logged and swallowed; they must not abort the round.
    async fn record(&self, observation: &Observation) {
        if let Some(writer) = &self.writer {
            match writer.write(observation) {
                Ok(path) => tracing::debug!(path = %path.display(), "Wrote status file"),
                Err(e) => tracing::warn!(
                    subject = observation.subject_name(),
                    error = %e,
                    "Could not write status file"
                ),
            }
        }

        if let Some(store) = &self.store {
            if let Err(e) = store.put(observation.clone()).await {
                tracing::warn!(
                    subject = observation.subject_name(),
                    error = %e,
                    "Could not persist observation"
                );
            }
        }

        if let Some(forwarder) = &self.forwarder {
            if let Err(e) = forwarder.submit(observation).await {
                tracing::warn!(
                    subject = observation.subject_name(),
                    error = %e,
                    "Could not forward observation"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProbeConfig;
    use crate::model::ObservationKind;

    fn aggregator(store: Arc<StatusStore>) -> Aggregator {
        let config = MonitoringConfig {
            // Names that resolve to DOWN on any host, whichever probe path
            // it supports.
            services: vec![
                "round-test-svc-a".to_string(),
                "round-test-svc-b".to_string(),
            ],
            application_name: "round-test-app".to_string(),
            output_dir: None,
            ingest_url: None,
        };
        Aggregator::new(
            ServiceProber::new(&ProbeConfig::default()),
            ObservationBuilder::with_host("h1"),
            &config,
        )
        .with_store(store)
    }

    #[tokio::test]
    async fn round_returns_services_first_application_last() {
        let store = Arc::new(StatusStore::in_memory());
        let round = aggregator(store.clone()).run_round().await;

        assert_eq!(round.len(), 3);
        assert_eq!(round[0].kind(), ObservationKind::Service);
        assert_eq!(round[0].subject_name(), "round-test-svc-a");
        assert_eq!(round[1].subject_name(), "round-test-svc-b");
        assert_eq!(round[2].kind(), ObservationKind::Application);
        assert_eq!(round[2].subject_name(), "round-test-app");
    }

    #[tokio::test]
    async fn round_persists_every_observation() {
        let store = Arc::new(StatusStore::in_memory());
        aggregator(store.clone()).run_round().await;

        for subject in ["round-test-svc-a", "round-test-svc-b", "round-test-app"] {
            assert!(
                store.find_latest_by_name(subject).await.unwrap().is_some(),
                "{subject} missing from the store"
            );
        }
    }

    #[tokio::test]
    async fn application_record_embeds_the_rounds_services() {
        let store = Arc::new(StatusStore::in_memory());
        let round = aggregator(store).run_round().await;

        match &round[2] {
            Observation::Application(application) => {
                let names: Vec<_> = application
                    .dependent_services
                    .iter()
                    .map(|s| s.service_name.as_str())
                    .collect();
                assert_eq!(names, vec!["round-test-svc-a", "round-test-svc-b"]);
                // Unresolvable fake services are DOWN, so the application
                // must be too.
                assert!(application.application_status.is_down());
            }
            Observation::Service(_) => panic!("expected the application record last"),
        }
    }
}
