//! JSON-RPC-over-HTTP ledger client.
//!
//! Wraps `reqwest::Client` with the registry node's base URL and provides a
//! typed method per RPC action. Amounts travel as decimal strings because
//! u128 does not survive JSON numbers intact.

use crate::error::LedgerError;
use crate::{Ledger, StoredCommit};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tcr_types::{
    AccountAddress, CommitmentHash, DomainName, RawDomainState, Timestamp, TokenAmount, TxHash,
    VoteChoice,
};

/// HTTP client for a registry node's JSON-RPC endpoint.
#[derive(Clone)]
pub struct HttpLedger {
    http: reqwest::Client,
    node_url: String,
}

impl HttpLedger {
    /// Create a client targeting the given base URL (e.g. `http://127.0.0.1:8545`).
    pub fn new(node_url: impl Into<String>) -> Result<Self, LedgerError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| LedgerError::Unavailable(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            node_url: node_url.into(),
        })
    }

    /// The configured node URL.
    pub fn node_url(&self) -> &str {
        &self.node_url
    }

    /// Send a JSON-RPC request and return the `result` field.
    async fn rpc_call(
        &self,
        action: &str,
        params: serde_json::Value,
    ) -> Result<serde_json::Value, LedgerError> {
        let mut body = params;
        body.as_object_mut()
            .ok_or_else(|| LedgerError::Rejected("params must be a JSON object".into()))?
            .insert("action".to_string(), serde_json::json!(action));

        let response = self
            .http
            .post(&self.node_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| LedgerError::Unavailable(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(LedgerError::Unavailable(format!(
                "node returned HTTP {}",
                response.status()
            )));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| LedgerError::Unavailable(format!("invalid JSON response: {e}")))?;

        if let Some(err) = json.get("error") {
            return Err(map_rpc_error(err));
        }

        Ok(json.get("result").cloned().unwrap_or(json))
    }
}

/// Structured error object returned by the node.
#[derive(Debug, Deserialize)]
struct RpcError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    needed: Option<String>,
    #[serde(default)]
    available: Option<String>,
}

fn map_rpc_error(err: &serde_json::Value) -> LedgerError {
    // Older nodes report a bare string; current ones a {code, message} object.
    if let Some(s) = err.as_str() {
        return LedgerError::Rejected(s.to_string());
    }
    let parsed: RpcError = match serde_json::from_value(err.clone()) {
        Ok(parsed) => parsed,
        Err(_) => return LedgerError::Rejected(err.to_string()),
    };
    if parsed.code == "insufficient_funds" {
        let needed = parsed.needed.as_deref().and_then(|s| s.parse().ok());
        let available = parsed.available.as_deref().and_then(|s| s.parse().ok());
        if let (Some(needed), Some(available)) = (needed, available) {
            return LedgerError::InsufficientFunds { needed, available };
        }
    }
    LedgerError::Rejected(parsed.message)
}

fn parse_amount(raw: &str, field: &str) -> Result<TokenAmount, LedgerError> {
    raw.parse::<TokenAmount>()
        .map_err(|e| LedgerError::Rejected(format!("invalid {field} value: {e}")))
}

fn parse_tx_hash(raw: &str) -> Result<TxHash, LedgerError> {
    let bytes = hex::decode(raw)
        .map_err(|e| LedgerError::Rejected(format!("invalid tx hash encoding: {e}")))?;
    let bytes: [u8; 32] = bytes
        .try_into()
        .map_err(|_| LedgerError::Rejected("tx hash must be 32 bytes".into()))?;
    Ok(TxHash::new(bytes))
}

// ── Typed RPC responses ────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct TxResult {
    hash: String,
    accepted: bool,
    #[serde(default)]
    detail: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ParameterResult {
    value: String,
}

#[derive(Debug, Deserialize)]
struct BalanceResult {
    balance: String,
}

#[derive(Debug, Deserialize)]
struct StoredCommitResult {
    #[serde(default)]
    commitment: Option<String>,
    #[serde(default)]
    weight: Option<String>,
    #[serde(default)]
    committed_at: Option<u64>,
}

impl TxResult {
    fn into_hash(self) -> Result<TxHash, LedgerError> {
        if !self.accepted {
            return Err(LedgerError::Rejected(
                self.detail.unwrap_or_else(|| "transaction not accepted".into()),
            ));
        }
        parse_tx_hash(&self.hash)
    }
}

#[async_trait]
impl Ledger for HttpLedger {
    async fn get_parameter(&self, name: &str) -> Result<TokenAmount, LedgerError> {
        let result = self
            .rpc_call("get_parameter", serde_json::json!({ "name": name }))
            .await?;
        let resp: ParameterResult = serde_json::from_value(result)
            .map_err(|e| LedgerError::Rejected(format!("invalid parameter response: {e}")))?;
        parse_amount(&resp.value, "parameter")
    }

    async fn apply(&self, domain: &DomainName, stake: TokenAmount) -> Result<TxHash, LedgerError> {
        let result = self
            .rpc_call(
                "apply",
                serde_json::json!({
                    "domain": domain.as_str(),
                    "stake": stake.to_string(),
                }),
            )
            .await?;
        let resp: TxResult = serde_json::from_value(result)
            .map_err(|e| LedgerError::Rejected(format!("invalid apply response: {e}")))?;
        tracing::debug!(domain = %domain, "apply transaction accepted");
        resp.into_hash()
    }

    async fn domain_state(&self, domain: &DomainName) -> Result<RawDomainState, LedgerError> {
        let result = self
            .rpc_call(
                "domain_state",
                serde_json::json!({ "domain": domain.as_str() }),
            )
            .await?;
        serde_json::from_value(result)
            .map_err(|e| LedgerError::Rejected(format!("invalid domain_state response: {e}")))
    }

    async fn account_balance(&self, account: &AccountAddress) -> Result<TokenAmount, LedgerError> {
        let result = self
            .rpc_call(
                "account_balance",
                serde_json::json!({ "account": account.as_str() }),
            )
            .await?;
        let resp: BalanceResult = serde_json::from_value(result)
            .map_err(|e| LedgerError::Rejected(format!("invalid balance response: {e}")))?;
        parse_amount(&resp.balance, "balance")
    }

    async fn commit(
        &self,
        domain: &DomainName,
        voter: &AccountAddress,
        commitment: CommitmentHash,
        weight: TokenAmount,
    ) -> Result<TxHash, LedgerError> {
        let result = self
            .rpc_call(
                "commit_vote",
                serde_json::json!({
                    "domain": domain.as_str(),
                    "voter": voter.as_str(),
                    "commitment": commitment.to_string(),
                    "weight": weight.to_string(),
                }),
            )
            .await?;
        let resp: TxResult = serde_json::from_value(result)
            .map_err(|e| LedgerError::Rejected(format!("invalid commit response: {e}")))?;
        resp.into_hash()
    }

    async fn reveal(
        &self,
        domain: &DomainName,
        voter: &AccountAddress,
        choice: VoteChoice,
        weight: TokenAmount,
        secret: &[u8],
    ) -> Result<TxHash, LedgerError> {
        let choice = match choice {
            VoteChoice::Support => "support",
            VoteChoice::Oppose => "oppose",
        };
        let result = self
            .rpc_call(
                "reveal_vote",
                serde_json::json!({
                    "domain": domain.as_str(),
                    "voter": voter.as_str(),
                    "choice": choice,
                    "weight": weight.to_string(),
                    "secret": hex::encode(secret),
                }),
            )
            .await?;
        let resp: TxResult = serde_json::from_value(result)
            .map_err(|e| LedgerError::Rejected(format!("invalid reveal response: {e}")))?;
        resp.into_hash()
    }

    async fn stored_commit(
        &self,
        domain: &DomainName,
        voter: &AccountAddress,
    ) -> Result<Option<StoredCommit>, LedgerError> {
        let result = self
            .rpc_call(
                "stored_commit",
                serde_json::json!({
                    "domain": domain.as_str(),
                    "voter": voter.as_str(),
                }),
            )
            .await?;
        let resp: StoredCommitResult = serde_json::from_value(result)
            .map_err(|e| LedgerError::Rejected(format!("invalid stored_commit response: {e}")))?;

        let (commitment, weight) = match (resp.commitment, resp.weight) {
            (Some(c), Some(w)) => (c, w),
            _ => return Ok(None),
        };
        let bytes = hex::decode(&commitment)
            .map_err(|e| LedgerError::Rejected(format!("invalid commitment encoding: {e}")))?;
        let bytes: [u8; 32] = bytes
            .try_into()
            .map_err(|_| LedgerError::Rejected("commitment must be 32 bytes".into()))?;
        Ok(Some(StoredCommit {
            commitment: CommitmentHash::new(bytes),
            weight: parse_amount(&weight, "weight")?,
            committed_at: Timestamp::new(resp.committed_at.unwrap_or(0)),
        }))
    }
}
