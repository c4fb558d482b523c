//! # wcms-client
//!
//! Typed async client for the WCMS web-services API: asset CRUD, workflow
//! settings, access rights, search, subscriber listing, and batch reads.
//!
//! The crate is a marshaling and error-normalization layer over a generic
//! RPC transport. Each [`Client`] method builds the operation's JSON
//! parameter tree, sends it through a [`Transport`], unwraps the
//! `<operation>Return` envelope, and checks the service's `success` flag;
//! rejections carry the server message verbatim.
//!
//! ```no_run
//! use wcms_client::{Client, ClientConfig};
//!
//! # async fn run() -> wcms_client::ClientResult<()> {
//! let mut client = Client::new(ClientConfig::new(
//!     "https://cms.example.edu/ws",
//!     "my-site",
//! ))?;
//! client.set_auth_by_key("api-key");
//!
//! let page = client.fetch_asset("about/index", "page").await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod mock;
pub mod secure_string;
pub mod testing;
pub mod transport;
pub mod types;

pub use client::Client;
pub use config::{Authentication, ClientConfig};
pub use error::{ClientError, ClientResult};
pub use mock::{MockTransport, RecordedCall};
pub use secure_string::SecureString;
pub use transport::{HttpTransport, Transport};
pub use types::{
    container_type, AccessLevel, AclEntry, AclEntryLevel, AclEntryType, AssetExistence,
    CopyRequest, Identifier, PathRef, ReadRequest,
};
