// system-tests/tests/helpers/harness.rs
// ============================================================================
// Module: Live Service Harness
// Description: Per-test setup for scenarios against the users service.
// Purpose: Provide a ready client, validator, lifecycle manager, and reporter.
// Dependencies: system-tests, crudcheck-client, crudcheck-core
// ============================================================================

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::OnceLock;
use std::sync::PoisonError;

use crudcheck_client::BlockingTransport;
use crudcheck_client::DataLifecycleManager;
use crudcheck_client::FileLifecycleSink;
use crudcheck_client::LifecycleSink;
use crudcheck_client::ProvisioningFailure;
use crudcheck_client::ResourceApiClient;
use crudcheck_client::ScopePolicy;
use crudcheck_client::StderrLifecycleSink;
use crudcheck_client::load_dataset;
use crudcheck_core::ContractValidator;
use serde_json::Value;
use system_tests::config::SystemTestConfig;

use super::artifacts::TestReporter;
use super::readiness::wait_for_service_ready;
use super::timeouts::DEFAULT_READY_TIMEOUT;
use super::timeouts::resolve_timeout;

/// Serializes scenarios within a test binary; the collection is shared.
fn collection_lock() -> MutexGuard<'static, ()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(())).lock().unwrap_or_else(PoisonError::into_inner)
}

/// Returns the bundled twelve-user dataset path.
pub fn bundled_dataset() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures").join("users.json")
}

/// Ready-to-use harness for one live scenario.
pub struct LiveHarness {
    config: SystemTestConfig,
    client: ResourceApiClient,
    validator: ContractValidator,
    reporter: TestReporter,
    _collection: MutexGuard<'static, ()>,
}

impl LiveHarness {
    /// Loads configuration, waits for the service, and opens the reporter.
    pub fn start(test_name: &str) -> Result<Self, Box<dyn Error>> {
        let collection = collection_lock();
        let config = SystemTestConfig::load_with_dotenv()?;
        let reporter = TestReporter::new(test_name, &config)?;
        let client = ResourceApiClient::from_config(&config.harness)?;
        let validator = ContractValidator::new()?;
        wait_for_service_ready(
            &client,
            &validator,
            config.harness.probe_timeout,
            resolve_timeout(&config, DEFAULT_READY_TIMEOUT),
        )?;
        Ok(Self {
            config,
            client,
            validator,
            reporter,
            _collection: collection,
        })
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &SystemTestConfig {
        &self.config
    }

    /// Returns the users client.
    pub fn client(&self) -> &ResourceApiClient {
        &self.client
    }

    /// Returns the response validator.
    pub fn validator(&self) -> &ContractValidator {
        &self.validator
    }

    /// Returns true when destructive clears are enabled.
    pub fn exclusive(&self) -> bool {
        self.config.harness.allow_clear
    }

    /// Returns the strictest scope policy the configuration permits.
    pub fn scope_policy(&self) -> ScopePolicy {
        if self.exclusive() { ScopePolicy::Exclusive } else { ScopePolicy::Tracked }
    }

    /// Builds a lifecycle manager logging into the test's artifact root.
    pub fn manager(&self) -> DataLifecycleManager<'_, BlockingTransport> {
        let log_path = self.reporter.artifacts().lifecycle_log();
        let sink: Arc<dyn LifecycleSink> = match FileLifecycleSink::new(&log_path) {
            Ok(sink) => Arc::new(sink),
            Err(_) => Arc::new(StderrLifecycleSink),
        };
        DataLifecycleManager::new(&self.client, &self.validator)
            .with_sink(sink)
            .allow_clear(self.config.harness.allow_clear)
    }

    /// Loads the configured dataset, or the bundled one.
    pub fn dataset(&self) -> Result<Vec<Value>, ProvisioningFailure> {
        let path = self.config.harness.dataset.clone().unwrap_or_else(bundled_dataset);
        load_dataset(&path)
    }

    /// Writes the transcript and a passing summary.
    pub fn finish(mut self, notes: Vec<String>) -> Result<(), Box<dyn Error>> {
        let transcript = self.client.transport().transcript();
        self.reporter.finish("pass", notes, &transcript)?;
        Ok(())
    }
}
