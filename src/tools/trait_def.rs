use async_trait::async_trait;
use serde_json::Value;

use super::error::ToolError;

#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn schema(&self) -> Value;
    async fn execute(&self, arguments: Value) -> Result<Value, ToolError>;
}
