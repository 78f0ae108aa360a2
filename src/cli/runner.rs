//! CLI runner

use super::commands::{Cli, Commands};
use crate::config::ClientSettings;
use crate::cursor::Position;
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig};
use crate::iterator::{CollectionIterator, IteratorOptions};
use crate::types::JsonValue;
use std::io::Write;
use std::sync::Arc;
use tracing::info;

/// Executes a parsed command line
#[derive(Debug)]
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the selected command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Walk {
                url,
                cursor,
                filter,
                batch_size,
                limit,
                descriptors_only,
                api_key,
                api_key_header,
                pretty,
            } => {
                let mut config = self.http_config()?;
                if let Some(key) = api_key {
                    if api_key_header.is_empty() {
                        return Err(Error::config("--api-key-header must not be empty"));
                    }
                    config
                        .default_headers
                        .insert(api_key_header.clone(), key.clone());
                }

                let options = IteratorOptions::new()
                    .with_cursor(cursor.clone().unwrap_or_default())
                    .with_filter(filter.clone().unwrap_or_default())
                    .with_batch_size(*batch_size)
                    .with_limit(*limit)
                    .with_descriptors_only(*descriptors_only);

                let client = Arc::new(HttpClient::with_config(config)?);
                let it = CollectionIterator::<JsonValue>::from_client(client, url.clone(), options)?;

                let stdout = std::io::stdout();
                walk(it, &mut stdout.lock(), *pretty).await
            }
            Commands::DecodeCursor { token } => {
                let position = Position::decode(token)?;
                println!("{}", serde_json::to_string_pretty(&position)?);
                Ok(())
            }
            Commands::EncodeCursor { link, offset } => {
                println!("{}", Position::new(link.clone(), *offset).encode());
                Ok(())
            }
        }
    }

    fn http_config(&self) -> Result<HttpClientConfig> {
        match &self.cli.settings {
            Some(path) => Ok(ClientSettings::from_file(path)?.to_http_config()),
            None => Ok(HttpClientConfig::default()),
        }
    }
}

/// Write every item as a JSON line, then report the resume cursor on stderr
pub(crate) async fn walk(
    mut it: CollectionIterator<JsonValue>,
    out: &mut impl Write,
    pretty: bool,
) -> Result<()> {
    while it.advance().await {
        if let Some(object) = it.current() {
            let line = if pretty {
                serde_json::to_string_pretty(object)?
            } else {
                serde_json::to_string(object)?
            };
            writeln!(out, "{line}")?;
        }
    }
    out.flush()?;

    info!("Walked {} items", it.count());
    eprintln!("cursor: {}", it.cursor());

    match it.take_error() {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client() -> Arc<HttpClient> {
        let config = HttpClientConfig::builder()
            .max_retries(0)
            .no_rate_limit()
            .build();
        Arc::new(HttpClient::with_config(config).unwrap())
    }

    #[tokio::test]
    async fn test_walk_writes_json_lines() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/items"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"id": 1}, {"id": 2}]
            })))
            .mount(&server)
            .await;

        let url = url::Url::parse(&format!("{}/items", server.uri())).unwrap();
        let it = CollectionIterator::<JsonValue>::from_client(client(), url, IteratorOptions::new())
            .unwrap();

        let mut out = Vec::new();
        walk(it, &mut out, false).await.unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "{\"id\":1}\n{\"id\":2}\n");
    }

    #[tokio::test]
    async fn test_walk_returns_fetch_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/items"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let url = url::Url::parse(&format!("{}/items", server.uri())).unwrap();
        let it = CollectionIterator::<JsonValue>::from_client(client(), url, IteratorOptions::new())
            .unwrap();

        let mut out = Vec::new();
        let err = walk(it, &mut out, false).await.unwrap_err();

        assert!(matches!(err.root(), Error::HttpStatus { status: 401, .. }));
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_cursor_commands() {
        let token = Position::new("https://api.test/items", 2).encode();
        let cli = Cli {
            settings: None,
            verbose: false,
            command: Commands::DecodeCursor { token },
        };
        assert!(Runner::new(cli).run().await.is_ok());

        let cli = Cli {
            settings: None,
            verbose: false,
            command: Commands::DecodeCursor {
                token: "%%%".to_string(),
            },
        };
        assert!(matches!(
            Runner::new(cli).run().await,
            Err(Error::CursorDecode { .. })
        ));
    }
}
