mod list;
mod transfer;


pub use list::RemoteEntry;

use url::Url;

use crate::{
    client::{Connector, HdfsClient},
    config::Config,
    error::{Error, HdfsResult},
    protocol::FilePermission,
    utils,
};

/// `scheme://host:port` part of a connect url
#[derive(Debug, Clone, PartialEq, Eq)]
struct Endpoint {
    protocol: String,
    node_port: String,
}

impl Endpoint {
    /// Splits `scheme://host:port/path...` into the endpoint and the root path
    fn parse(url: &str) -> HdfsResult<(Self, String)> {
        let invalid = || Error::InvalidUrl(url.to_owned());

        let (protocol, rest) = url.split_once("://").ok_or_else(invalid)?;
        let (node_port, path) = rest.find('/').map_or((rest, ""), |at| rest.split_at(at));
        if protocol.is_empty() || node_port.is_empty() {
            return Err(invalid());
        }

        let endpoint = Self {
            protocol: protocol.to_owned(),
            node_port: node_port.to_owned(),
        };

        let parsed = Url::parse(&endpoint.url()).map_err(|_| invalid())?;
        if parsed.host_str().map_or(true, str::is_empty) {
            return Err(invalid());
        }

        Ok((endpoint, utils::normalize(path)))
    }

    fn url(&self) -> String {
        format!("{}://{}", self.protocol, self.node_port)
    }
}

/// A path-scoped HDFS session.
///
/// Holds the current working root and the client handle bound to it. Every
/// path given to a keyword is resolved against the root before it reaches the
/// client, and nothing is sent anywhere before a successful [`connect`].
///
/// Keywords run one at a time: reconnecting needs `&mut self`, so no other
/// keyword can be using the handle while it is being replaced.
///
/// [`connect`]: Session::connect
pub struct Session<C: Connector> {
    connector: C,
    config: Config,
    endpoint: Option<Endpoint>,
    root: String,
    user: Option<String>,
    client: Option<C::Client>,
}

impl<C: Connector> Session<C> {
    /// Creates a disconnected session configured from the environment
    pub fn new(connector: C) -> Self {
        Self::with_config(connector, Config::from_env())
    }

    pub fn with_config(connector: C, config: Config) -> Self {
        Self {
            connector,
            user: config.user.clone(),
            config,
            endpoint: None,
            root: "/".to_owned(),
            client: None,
        }
    }

    /// User for the next `connect` or `change_directory`
    pub fn set_connected_user<T: Into<String>>(&mut self, user: T) {
        self.user = Some(user.into());
    }

    pub fn connected_user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn protocol(&self) -> Option<&str> {
        self.endpoint.as_ref().map(|e| e.protocol.as_str())
    }

    pub fn node_port(&self) -> Option<&str> {
        self.endpoint.as_ref().map(|e| e.node_port.as_str())
    }

    /// `scheme://host:port` of the current connection
    pub fn endpoint(&self) -> Option<String> {
        self.endpoint.as_ref().map(Endpoint::url)
    }

    /// Current working root, always an absolute POSIX path
    pub fn root(&self) -> &str {
        &self.root
    }

    pub const fn is_connected(&self) -> bool {
        self.client.is_some()
    }

    pub const fn config(&self) -> &Config {
        &self.config
    }

    fn client(&self) -> HdfsResult<&C::Client> {
        self.client.as_ref().ok_or(Error::NotConnected)
    }

    fn resolve(&self, path: &str) -> String {
        utils::join(&self.root, path)
    }

    /// Connects to `scheme://host:port/path`, making `/path` the root.
    ///
    /// Any previous handle is dropped without being closed.
    pub async fn connect(&mut self, url: &str) -> HdfsResult<()> {
        let (endpoint, root) = Endpoint::parse(url)?;
        let client = self
            .connector
            .connect(&endpoint.url(), self.user.as_deref(), &root)
            .await?;

        info!(
            "connected to {} with root {} as {}",
            endpoint.url(),
            root,
            self.user.as_deref().unwrap_or("<default>")
        );

        self.endpoint = Some(endpoint);
        self.root = root;
        self.client = Some(client);

        Ok(())
    }

    /// Moves the root to `path` (relative or absolute) and rebinds the handle
    /// with the endpoint of the last `connect`
    pub async fn change_directory(&mut self, path: &str) -> HdfsResult<()> {
        let endpoint = match (&self.endpoint, &self.client) {
            (Some(endpoint), Some(_)) => endpoint.url(),
            _ => return Err(Error::NotConnected),
        };

        let root = self.resolve(path);
        let client = self
            .connector
            .connect(&endpoint, self.user.as_deref(), &root)
            .await?;

        info!("changed directory from {} to {}", self.root, root);

        self.root = root;
        self.client = Some(client);

        Ok(())
    }

    /// Lists `path` relative to the root. Recursive listings contain only
    /// the non-directory entries below `path`.
    pub async fn list(&self, path: &str, recursive: bool) -> HdfsResult<Vec<RemoteEntry>> {
        let client = self.client()?;
        list::list_tree(client, &self.resolve(path), recursive).await
    }

    /// Creates a directory and its parents
    pub async fn mkdirs(&self, path: &str) -> HdfsResult<()> {
        let client = self.client()?;
        let path = self.resolve(path);

        debug!("mkdirs {path}");
        Ok(client.makedirs(&path).await?)
    }

    /// Sets an octal permission such as `755` on `path`
    pub async fn set_permission(&self, path: &str, permission: &str) -> HdfsResult<()> {
        let client = self.client()?;
        let mode = FilePermission::from_octal(permission)
            .ok_or_else(|| Error::InvalidPermission(permission.to_owned()))?;
        let path = self.resolve(path);

        debug!("set permission {mode} on {path}");
        Ok(client.set_permission(&path, mode).await?)
    }
}
