use super::dashboard_api::DashboardApiProvider;
#[cfg(not(target_arch = "wasm32"))]
use super::yahoo_finance::YahooFinanceProvider;
use super::traits::BenchmarkHistoryProvider;

/// Ordered list of benchmark history providers.
///
/// Providers are tried in registration order; the history service falls
/// back to the next one when a provider fails.
pub struct BenchmarkProviderRegistry {
    providers: Vec<Box<dyn BenchmarkHistoryProvider>>,
}

impl BenchmarkProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Dashboard API first (server-side cached), Yahoo Finance as fallback.
    pub fn new_with_defaults(api_base_url: &str) -> Self {
        let mut registry = Self::new();

        registry.register(Box::new(DashboardApiProvider::new(api_base_url)));

        // Not available on WASM (uses native reqwest/tokio connectors)
        #[cfg(not(target_arch = "wasm32"))]
        {
            match YahooFinanceProvider::new() {
                Ok(yahoo) => registry.register(Box::new(yahoo)),
                Err(e) => log::warn!("Yahoo Finance fallback unavailable: {e}"),
            }
        }

        registry
    }

    /// Register a new provider at the lowest priority.
    pub fn register(&mut self, provider: Box<dyn BenchmarkHistoryProvider>) {
        self.providers.push(provider);
    }

    /// All providers, highest priority first.
    pub fn providers(&self) -> Vec<&dyn BenchmarkHistoryProvider> {
        self.providers.iter().map(|p| p.as_ref()).collect()
    }

    pub fn provider_names(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.name().to_string()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl Default for BenchmarkProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
