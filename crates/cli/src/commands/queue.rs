//! Link queue commands, run against a live server through the typed client.

use brandgate_client::{Backend, ClientError, HttpBackend};
use brandgate_core::{LinkId, LinkItem};

/// A client session, logged in lazily for commands that need it.
pub struct QueueSession {
    backend: HttpBackend,
    email: Option<String>,
    password: Option<String>,
}

impl QueueSession {
    /// # Errors
    ///
    /// Returns an error if `url` is not a valid base URL.
    pub fn new(url: &str, email: Option<&str>, password: Option<&str>) -> Result<Self, ClientError> {
        Ok(Self {
            backend: HttpBackend::new(url)?,
            email: email.map(str::to_owned),
            password: password.map(str::to_owned),
        })
    }

    async fn login(&self) -> Result<(), ClientError> {
        let (Some(email), Some(password)) = (&self.email, &self.password) else {
            return Err(ClientError::Permission(
                "this command needs --email and BRANDGATE_ADMIN_PASSWORD".to_owned(),
            ));
        };
        self.backend.login(email, password).await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns the server error.
    pub async fn list(&self) -> Result<(), ClientError> {
        print_queue(&self.backend.get_link_queue().await?);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns the server error.
    pub async fn add(&self, url: &str) -> Result<(), ClientError> {
        self.login().await?;
        print_queue(&self.backend.add_link_to_queue(url).await?);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns a validation error for a malformed id, or the server error.
    pub async fn remove(&self, id: &str) -> Result<(), ClientError> {
        let id: LinkId = id
            .parse()
            .map_err(|_| ClientError::Validation(format!("invalid link id: {id}")))?;
        self.login().await?;
        print_queue(&self.backend.remove_link_from_queue(id).await?);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns the server error.
    pub async fn clear(&self) -> Result<(), ClientError> {
        self.login().await?;
        self.backend.clear_queue().await?;
        tracing::info!("Queue cleared");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns the server error.
    pub async fn consume(&self) -> Result<(), ClientError> {
        match self.backend.consume_next_link().await? {
            Some(url) => {
                #[allow(clippy::print_stdout)]
                {
                    println!("{url}");
                }
            }
            None => tracing::info!("Queue is empty"),
        }
        Ok(())
    }
}

#[allow(clippy::print_stdout)]
fn print_queue(items: &[LinkItem]) {
    if items.is_empty() {
        println!("(empty)");
        return;
    }
    for item in items {
        println!(
            "{}  {}  {}",
            item.id,
            item.created_at.format("%Y-%m-%d %H:%M:%S"),
            item.url
        );
    }
}
