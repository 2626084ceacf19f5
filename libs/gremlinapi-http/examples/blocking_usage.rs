//! Blocking usage of the Gremlin API transport layer
//!
//! To run this example:
//! ```bash
//! export GREMLIN_API_KEY="your-key-here"
//! export GREMLIN_BASE_URI="https://api.gremlin.com/v1"  # Optional
//! cargo run --example blocking_usage -- <team-id>
//! ```

use gremlinapi_http::{
    AuthConfig, ClientError, GremlinApiConfig, GremlinClient, RequestOptions, Verb,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let team_id = std::env::args().nth(1).unwrap_or_default();

    let config = GremlinApiConfig::from_env()?;
    let client = GremlinClient::from_config_strict(config)?;
    println!("Transport: {}", client.transport_name());

    let headers = client.header(&AuthConfig::default())?;
    let options = RequestOptions::new().headers(headers).query("teamId", team_id);

    match client.api_call_blocking(Verb::Get, "/users", options) {
        Ok((response, body)) => {
            println!("Status: {}", response.status());
            println!("Body: {body:?}");
        }
        Err(ClientError::Http { response, body }) => {
            println!("Request failed with {}: {body:?}", response.status());
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
