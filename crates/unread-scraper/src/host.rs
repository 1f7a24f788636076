//! The embedded page as seen by the poll loop.

use std::future::Future;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::script::PageScript;
use crate::Result;

/// A live browser surface: its title and a way to run scripts in it.
pub trait PageHost: Send + Sync {
    /// `false` once the hosting window has been torn down.
    fn is_alive(&self) -> bool;

    /// Current page title.
    fn title(&self) -> String;

    /// Evaluate `script` in the page and resolve with its JSON result.
    fn run_script(&self, script: &PageScript) -> impl Future<Output = Result<Value>> + Send;
}

impl<T: PageHost> PageHost for Arc<T> {
    fn is_alive(&self) -> bool {
        self.as_ref().is_alive()
    }

    fn title(&self) -> String {
        self.as_ref().title()
    }

    async fn run_script(&self, script: &PageScript) -> Result<Value> {
        self.as_ref().run_script(script).await
    }
}

/// Run `script` and deserialize its result.
pub async fn run_typed<H, T>(host: &H, script: &PageScript) -> Result<T>
where
    H: PageHost,
    T: DeserializeOwned,
{
    let value = host.run_script(script).await?;
    Ok(serde_json::from_value(value)?)
}
