use tokio::sync::OnceCell;

use crate::{IndexClient, IndexClientError, IndexClientOptions};

/// Process-wide index client that is built on first use and reused afterwards.
///
/// Construct once at start-up, wrap in an `Arc` and hand it to whatever needs the
/// backend. Nothing is allocated or connected until the first call to [`get`].
///
/// [`get`]: LazyIndexClient::get
#[derive(Debug)]
pub struct LazyIndexClient {
    options: IndexClientOptions,
    cell: OnceCell<IndexClient>,
}

impl LazyIndexClient {
    pub fn new(options: IndexClientOptions) -> Self {
        Self {
            options,
            cell: OnceCell::new(),
        }
    }

    pub async fn get(&self) -> Result<&IndexClient, IndexClientError> {
        self.cell
            .get_or_try_init(|| async {
                let client = IndexClient::new(self.options.clone())?;
                tracing::info!(url = %client.base_url(), "Index client initialized");
                Ok(client)
            })
            .await
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.initialized()
    }
}
