//! Live cluster access through kube-rs

use crate::convert;
use crate::error::{KubeError, Result};
use async_trait::async_trait;
use k8s_openapi::api::batch::v1::Job;
use k8s_openapi::api::core::v1::{Namespace, Pod};
use kube::api::{DeleteParams, ListParams, ObjectList};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Api, Client, Config, Resource};
use reclaim_domain::{ClusterApi, JobSnapshot, ListFilter, PodSnapshot};
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Timeout for connecting to the API server
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for reading API responses
const READ_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum attempts for transient list failures
const MAX_RETRIES: u32 = 3;

/// Base delay for exponential backoff (doubles each retry)
const RETRY_BASE_DELAY: Duration = Duration::from_millis(100);

/// Page size for paginated list requests
const PAGE_SIZE: u32 = 500;

/// A connected Kubernetes cluster
#[derive(Clone)]
pub struct KubeCluster {
    client: Client,
    context: String,
}

impl KubeCluster {
    /// Connect using a kubeconfig context, or infer the configuration
    ///
    /// With `None` the usual inference applies: in-cluster service account
    /// first, then the current kubeconfig context.
    pub async fn connect(context: Option<&str>) -> Result<Self> {
        let (mut config, label) = match context {
            Some(name) => {
                let kubeconfig = Kubeconfig::read()?;
                if !kubeconfig.contexts.iter().any(|c| c.name == name) {
                    return Err(KubeError::ContextNotFound(name.to_string()));
                }
                let config = Config::from_custom_kubeconfig(
                    kubeconfig,
                    &KubeConfigOptions {
                        context: Some(name.to_string()),
                        ..Default::default()
                    },
                )
                .await?;
                (config, name.to_string())
            }
            None => (Config::infer().await?, "current".to_string()),
        };

        config.connect_timeout = Some(CONNECT_TIMEOUT);
        config.read_timeout = Some(READ_TIMEOUT);
        let server = config.cluster_url.to_string();

        let client = Client::try_from(config).map_err(|source| KubeError::Client {
            context: label.clone(),
            source,
        })?;

        info!(context = %label, server = %server, "Connected to cluster");
        Ok(Self::from_client(client, label))
    }

    /// Wrap an existing client
    pub fn from_client(client: Client, context: impl Into<String>) -> Self {
        Self {
            client,
            context: context.into(),
        }
    }

    /// Context name used for logging
    pub fn context(&self) -> &str {
        &self.context
    }

    /// List every object across pages, retrying transient failures per page
    async fn list_all<K>(&self, api: &Api<K>, base: &ListParams, what: &str) -> Result<Vec<K>>
    where
        K: Resource + Clone + DeserializeOwned + Debug,
    {
        let mut items = Vec::new();
        let mut continue_token: Option<String> = None;
        let mut pages = 0u32;

        loop {
            let mut params = base.clone().limit(PAGE_SIZE);
            if let Some(token) = &continue_token {
                params = params.continue_token(token);
            }

            let page = self.list_page_with_retry(api, &params, what).await?;
            pages += 1;
            items.extend(page.items);

            match page.metadata.continue_ {
                Some(token) if !token.is_empty() => {
                    debug!(
                        context = %self.context,
                        what = %what,
                        page = pages,
                        total_so_far = items.len(),
                        "Fetched page, continuing"
                    );
                    continue_token = Some(token);
                }
                _ => break,
            }
        }

        Ok(items)
    }

    async fn list_page_with_retry<K>(
        &self,
        api: &Api<K>,
        params: &ListParams,
        what: &str,
    ) -> Result<ObjectList<K>>
    where
        K: Resource + Clone + DeserializeOwned + Debug,
    {
        let mut attempt = 0;
        loop {
            match api.list(params).await {
                Ok(list) => return Ok(list),
                Err(e) if is_retryable(&e) => {
                    attempt += 1;
                    if attempt >= MAX_RETRIES {
                        return Err(KubeError::RetriesExhausted {
                            attempts: attempt,
                            source: e,
                        });
                    }
                    let delay = backoff_delay(attempt - 1);
                    warn!(
                        context = %self.context,
                        what = %what,
                        attempt,
                        max_attempts = MAX_RETRIES,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Retryable error, backing off"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    debug!(context = %self.context, what = %what, error = %e, "Non-retryable error");
                    return Err(KubeError::Api(e));
                }
            }
        }
    }
}

/// Connection failures and 429/503/504 responses
pub fn is_retryable(err: &kube::Error) -> bool {
    match err {
        kube::Error::HyperError(_) | kube::Error::Service(_) => true,
        kube::Error::Api(response) => matches!(response.code, 429 | 503 | 504),
        _ => false,
    }
}

fn backoff_delay(retry: u32) -> Duration {
    RETRY_BASE_DELAY * 2u32.pow(retry)
}

#[async_trait]
impl ClusterApi for KubeCluster {
    type Error = KubeError;

    async fn list_namespaces(&self) -> Result<Vec<String>> {
        let api: Api<Namespace> = Api::all(self.client.clone());
        let namespaces = self
            .list_all(&api, &ListParams::default(), "namespaces")
            .await?;
        Ok(namespaces.iter().filter_map(convert::namespace_name).collect())
    }

    async fn list_pods(&self, namespace: &str, filter: &ListFilter) -> Result<Vec<PodSnapshot>> {
        let api: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        let pods = self
            .list_all(&api, &convert::list_params(filter), "pods")
            .await?;
        Ok(pods.iter().map(convert::pod_snapshot).collect())
    }

    async fn list_jobs(&self, namespace: &str, filter: &ListFilter) -> Result<Vec<JobSnapshot>> {
        let api: Api<Job> = Api::namespaced(self.client.clone(), namespace);
        let jobs = self
            .list_all(&api, &convert::list_params(filter), "jobs")
            .await?;
        Ok(jobs.iter().map(convert::job_snapshot).collect())
    }

    async fn delete_pod(&self, namespace: &str, name: &str) -> Result<()> {
        let api: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        api.delete(name, &DeleteParams::foreground()).await?;
        Ok(())
    }

    async fn delete_job(&self, namespace: &str, name: &str) -> Result<()> {
        let api: Api<Job> = Api::namespaced(self.client.clone(), namespace);
        api.delete(name, &DeleteParams::foreground()).await?;
        Ok(())
    }
}
