//! The web-services client.
//!
//! One method per remote operation. Every method builds the operation's
//! parameter tree, hands it to the [`Transport`], unwraps the
//! `<operation>Return` envelope, and checks the service's string-typed
//! `success` flag. Rejections surface as
//! [`ClientError::Rejected`](crate::ClientError::Rejected) carrying the
//! server message verbatim.

use crate::config::{Authentication, ClientConfig};
use crate::error::{ClientError, ClientResult};
use crate::transport::{HttpTransport, Transport};
use crate::types::{
    container_type, AccessLevel, AclEntry, AssetExistence, CopyRequest, Identifier, OneOrMany,
    PathRef, ReadRequest,
};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::instrument;

/// Client for the WCMS web-services API.
///
/// Holds the target site, the credentials sent with every request, and the
/// RPC transport. All operations are one-shot request/response calls.
pub struct Client {
    config: ClientConfig,
    authentication: Option<Authentication>,
    transport: Arc<dyn Transport>,
}

impl Client {
    /// Creates a client with an [`HttpTransport`] built from the config.
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let transport = Arc::new(HttpTransport::new(&config)?);
        Ok(Self::with_transport(config, transport))
    }

    /// Creates a client over an existing transport. Used by tests to inject
    /// a [`MockTransport`](crate::mock::MockTransport).
    pub fn with_transport(mut config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        config.site_name = config.site_name.trim().to_string();
        Self {
            config,
            authentication: None,
            transport,
        }
    }

    /// Switches to API-key authentication, replacing any previous
    /// credentials.
    pub fn set_auth_by_key(&mut self, api_key: &str) -> &mut Self {
        self.authentication = Some(Authentication::api_key(api_key));
        self
    }

    /// Switches to username/password authentication, replacing any previous
    /// credentials.
    pub fn set_auth_by_username_password(&mut self, username: &str, password: &str) -> &mut Self {
        self.authentication = Some(Authentication::username_password(username, password));
        self
    }

    pub fn site_name(&self) -> &str {
        &self.config.site_name
    }

    pub fn set_site_name(&mut self, site_name: &str) {
        self.config.site_name = site_name.trim().to_string();
    }

    /// The endpoint the underlying transport talks to.
    pub fn endpoint(&self) -> &str {
        self.transport.endpoint()
    }

    /// The underlying transport handle.
    pub fn transport(&self) -> Arc<dyn Transport> {
        Arc::clone(&self.transport)
    }

    /// Creates an asset of the given type. The client injects `siteName`
    /// into the payload before sending. Returns the `createReturn` envelope,
    /// which carries the new asset's id.
    #[instrument(skip(self, asset))]
    pub async fn create_asset(&self, asset_type: &str, asset: Value) -> ClientResult<Value> {
        let params = json!({
            "authentication": self.auth_value(),
            "asset": self.tagged_asset(asset_type, asset)?,
        });

        let response = self.transport.call("create", params).await?;
        Self::unwrap_envelope("create", response)
    }

    /// Reads an asset and returns its payload.
    #[instrument(skip(self))]
    pub async fn fetch_asset(&self, path: &str, asset_type: &str) -> ClientResult<Value> {
        let params = json!({
            "authentication": self.auth_value(),
            "identifier": self.identifier(path, asset_type, None),
        });

        let response = self.transport.call("read", params).await?;
        let envelope = Self::unwrap_envelope("read", response)?;
        envelope.get("asset").cloned().ok_or_else(|| {
            ClientError::InvalidResponse("readReturn is missing the asset member".to_string())
        })
    }

    /// Probes whether an asset exists.
    ///
    /// A read failure only proves absence when the service says so; any
    /// other failure (auth, transport, outage) yields `Undetermined`.
    #[instrument(skip(self))]
    pub async fn asset_exists(&self, path: &str, asset_type: &str) -> AssetExistence {
        match self.fetch_asset(path, asset_type).await {
            Ok(_) => AssetExistence::Exists,
            Err(err) if err.is_no_such_asset() => AssetExistence::Missing,
            Err(_) => AssetExistence::Undetermined,
        }
    }

    /// Copies an asset into a destination container.
    ///
    /// The destination container type is derived from the source type via
    /// the container lookup table. The destination site defaults to the
    /// client's site, and the copy's name defaults to the source asset's
    /// name (the last segment of its path).
    #[instrument(skip(self, request), fields(from_path = %request.from_path))]
    pub async fn copy_asset(&self, request: CopyRequest) -> ClientResult<()> {
        let source_name = request
            .from_path
            .rsplit('/')
            .next()
            .unwrap_or(request.from_path.as_str());

        let destination = Identifier {
            asset_type: container_type(&request.source_type)?,
            path: PathRef {
                path: request.to_container_path.clone(),
                site_name: request
                    .to_site_name
                    .as_deref()
                    .filter(|s| !s.is_empty())
                    .unwrap_or(&self.config.site_name)
                    .to_string(),
            },
            id: None,
        };

        let new_name = request
            .new_name
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(source_name);

        let params = json!({
            "authentication": self.auth_value(),
            "identifier": self.identifier(&request.from_path, &request.source_type, None),
            "copyParameters": {
                "destinationContainerIdentifier": destination,
                "doWorkflow": request.do_workflow,
                "newName": new_name,
            },
        });

        let response = self.transport.call("copy", params).await?;
        Self::unwrap_envelope("copy", response).map(|_| ())
    }

    /// Saves changes to an existing asset. The client injects `siteName`
    /// into the payload before sending.
    #[instrument(skip(self, asset))]
    pub async fn save_asset(&self, asset_type: &str, asset: Value) -> ClientResult<()> {
        let params = json!({
            "authentication": self.auth_value(),
            "asset": self.tagged_asset(asset_type, asset)?,
        });

        let response = self.transport.call("edit", params).await?;
        Self::unwrap_envelope("edit", response).map(|_| ())
    }

    /// Deletes an asset.
    #[instrument(skip(self))]
    pub async fn delete_asset(&self, asset_type: &str, path: &str) -> ClientResult<()> {
        let params = json!({
            "authentication": self.auth_value(),
            "identifier": self.identifier(path, asset_type, None),
        });

        let response = self.transport.call("delete", params).await?;
        Self::unwrap_envelope("delete", response).map(|_| ())
    }

    /// Reads the workflow settings attached to an asset.
    #[instrument(skip(self))]
    pub async fn read_workflow_settings(
        &self,
        asset_type: &str,
        path: &str,
    ) -> ClientResult<Value> {
        let params = json!({
            "authentication": self.auth_value(),
            "identifier": self.identifier(path, asset_type, None),
        });

        let response = self.transport.call("readWorkflowSettings", params).await?;
        let envelope = Self::unwrap_envelope("readWorkflowSettings", response)?;
        envelope.get("workflowSettings").cloned().ok_or_else(|| {
            ClientError::InvalidResponse(
                "readWorkflowSettingsReturn is missing the workflowSettings member".to_string(),
            )
        })
    }

    /// Writes workflow settings back. The payload must carry its own
    /// identifier, as returned by [`read_workflow_settings`](Self::read_workflow_settings).
    #[instrument(skip(self, workflow_settings))]
    pub async fn edit_workflow_settings(&self, workflow_settings: Value) -> ClientResult<()> {
        let params = json!({
            "authentication": self.auth_value(),
            "workflowSettings": workflow_settings,
        });

        let response = self.transport.call("editWorkflowSettings", params).await?;
        Self::unwrap_envelope("editWorkflowSettings", response).map(|_| ())
    }

    /// Runs a search and returns the `matches` payload, or `null` when the
    /// service returns none.
    #[instrument(skip(self, search_information))]
    pub async fn search(&self, search_information: Value) -> ClientResult<Value> {
        let params = json!({
            "authentication": self.auth_value(),
            "searchInformation": search_information,
        });

        let response = self.transport.call("search", params).await?;
        let envelope = Self::unwrap_envelope("search", response)?;
        Ok(envelope.get("matches").cloned().unwrap_or(Value::Null))
    }

    /// Lists the assets subscribed to the given asset.
    ///
    /// The service omits the member entirely for an empty list and returns
    /// a bare object for a single subscriber; both normalize to a `Vec`.
    #[instrument(skip(self))]
    pub async fn list_subscribers(
        &self,
        path: &str,
        asset_type: &str,
        site_name: Option<&str>,
    ) -> ClientResult<Vec<Identifier>> {
        let params = json!({
            "authentication": self.auth_value(),
            "identifier": self.identifier(path, asset_type, site_name),
        });

        let response = self.transport.call("listSubscribers", params).await?;
        let envelope = Self::unwrap_envelope("listSubscribers", response)?;

        match envelope
            .get("subscribers")
            .and_then(|s| s.get("assetIdentifier"))
        {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(value) => serde_json::from_value::<OneOrMany<Identifier>>(value.clone())
                .map(OneOrMany::into_vec)
                .map_err(|e| {
                    ClientError::InvalidResponse(format!(
                        "failed to parse subscriber identifiers: {}",
                        e
                    ))
                }),
        }
    }

    /// Lists the assets subscribed to a metadata set.
    pub async fn list_metadata_set_subscribers(
        &self,
        path: &str,
        site_name: Option<&str>,
    ) -> ClientResult<Vec<Identifier>> {
        self.list_subscribers(path, "metadataset", site_name).await
    }

    /// Reads several assets in one round trip.
    ///
    /// Each entry becomes a `read` operation carrying its own
    /// authentication, batched into a single `batch` call. Returns the
    /// per-read `readResult` payloads in request order.
    #[instrument(skip(self, reads), fields(count = reads.len()))]
    pub async fn batch_read(&self, reads: &[ReadRequest]) -> ClientResult<Vec<Value>> {
        let operations: Vec<Value> = reads
            .iter()
            .map(|read| {
                json!({
                    "read": {
                        "authentication": self.auth_value(),
                        "identifier": self.identifier(&read.path, &read.asset_type, None),
                    },
                })
            })
            .collect();

        let params = json!({
            "authentication": self.auth_value(),
            "operation": operations,
        });

        let response = self.transport.call("batch", params).await?;
        let batch = response.get("batchReturn").cloned().ok_or_else(|| {
            ClientError::InvalidResponse("response is missing the batchReturn member".to_string())
        })?;

        let items = serde_json::from_value::<OneOrMany<Value>>(batch)
            .map_err(|e| {
                ClientError::InvalidResponse(format!("failed to parse batchReturn: {}", e))
            })?
            .into_vec();

        Ok(items
            .into_iter()
            .map(|item| item.get("readResult").cloned().unwrap_or(Value::Null))
            .collect())
    }

    /// Reads the access rights attached to an asset.
    #[instrument(skip(self))]
    pub async fn read_access(&self, path: &str, asset_type: &str) -> ClientResult<Value> {
        let params = json!({
            "authentication": self.auth_value(),
            "identifier": self.identifier(path, asset_type, None),
        });

        let response = self.transport.call("readAccessRights", params).await?;
        let envelope = Self::unwrap_envelope("readAccessRights", response)?;
        envelope
            .get("accessRightsInformation")
            .cloned()
            .ok_or_else(|| {
                ClientError::InvalidResponse(
                    "readAccessRightsReturn is missing the accessRightsInformation member"
                        .to_string(),
                )
            })
    }

    /// Writes access rights for an asset. `acl_entries` may be empty;
    /// `all_level` always applies.
    #[instrument(skip(self, identifier, acl_entries))]
    pub async fn save_access(
        &self,
        identifier: Identifier,
        acl_entries: Vec<AclEntry>,
        all_level: AccessLevel,
        apply_to_children: bool,
    ) -> ClientResult<()> {
        if identifier.asset_type.trim().is_empty() {
            return Err(ClientError::InvalidRequest(
                "identifier type is not set".to_string(),
            ));
        }

        let params = json!({
            "authentication": self.auth_value(),
            "accessRightsInformation": {
                "identifier": identifier,
                "aclEntries": {
                    "aclEntry": acl_entries,
                },
                "allLevel": all_level,
            },
            "applyToChildren": apply_to_children,
        });

        let response = self.transport.call("editAccessRights", params).await?;
        Self::unwrap_envelope("editAccessRights", response).map(|_| ())
    }

    /// Builds an identifier, defaulting the site to the client's site when
    /// no override is given.
    fn identifier(&self, path: &str, asset_type: &str, site_name: Option<&str>) -> Identifier {
        Identifier::new(
            path,
            asset_type,
            site_name
                .filter(|s| !s.is_empty())
                .unwrap_or(&self.config.site_name),
        )
    }

    /// Wraps an asset payload as `{type: asset}` with `siteName` injected.
    fn tagged_asset(&self, asset_type: &str, mut asset: Value) -> ClientResult<Map<String, Value>> {
        let Some(fields) = asset.as_object_mut() else {
            return Err(ClientError::InvalidRequest(
                "asset payload must be a JSON object".to_string(),
            ));
        };
        fields.insert(
            "siteName".to_string(),
            Value::String(self.config.site_name.clone()),
        );

        let mut tagged = Map::new();
        tagged.insert(asset_type.to_string(), asset);
        Ok(tagged)
    }

    /// The `authentication` member sent with every request. An empty object
    /// when no credentials are set, which the service rejects with its own
    /// message.
    fn auth_value(&self) -> Value {
        match &self.authentication {
            Some(auth) => serde_json::to_value(auth).unwrap_or_else(|_| Value::Object(Map::new())),
            None => Value::Object(Map::new()),
        }
    }

    /// Unwraps the `<operation>Return` envelope and checks the success
    /// flag. The service encodes booleans as strings, so success is the
    /// literal `"true"`.
    fn unwrap_envelope(operation: &str, response: Value) -> ClientResult<Value> {
        let key = format!("{}Return", operation);
        let envelope = response.get(&key).cloned().ok_or_else(|| {
            ClientError::InvalidResponse(format!("response is missing the {} envelope", key))
        })?;

        let success = envelope.get("success").and_then(Value::as_str);
        if success == Some("true") {
            Ok(envelope)
        } else {
            Err(ClientError::Rejected {
                operation: operation.to_string(),
                message: envelope
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unwrap_envelope_success() {
        let response = json!({
            "readReturn": {"success": "true", "asset": {"page": {}}}
        });
        let envelope = Client::unwrap_envelope("read", response).unwrap();
        assert_eq!(envelope["success"], "true");
    }

    #[test]
    fn test_unwrap_envelope_rejection_keeps_message() {
        let response = json!({
            "editReturn": {"success": "false", "message": "Workflow required"}
        });
        let err = Client::unwrap_envelope("edit", response).unwrap_err();
        assert!(
            matches!(err, ClientError::Rejected { ref operation, ref message }
                if operation == "edit" && message == "Workflow required")
        );
    }

    #[test]
    fn test_unwrap_envelope_boolean_success_is_rejection() {
        // The service encodes booleans as strings; a real JSON true is not
        // a success flag this client will accept.
        let response = json!({"deleteReturn": {"success": true}});
        assert!(Client::unwrap_envelope("delete", response).is_err());
    }

    #[test]
    fn test_unwrap_envelope_missing_envelope() {
        let err = Client::unwrap_envelope("copy", json!({})).unwrap_err();
        assert!(matches!(err, ClientError::InvalidResponse(_)));
    }
}
