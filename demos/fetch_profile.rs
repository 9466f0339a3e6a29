//! Fetches the normalized profile and an application token for an existing access token.
//!
//! Run with `TAMPERE_ACCESS_TOKEN` set and, optionally, `TAMPERE_TARGET_APP`.

// std
use std::{env, time::Duration};
// crates.io
use color_eyre::{Result, eyre::eyre};
// self
use tampere_oauth2::{
	config::ProviderConfig, error::ErrorKind, http::ReqwestHttpClient,
	oauth::ReqwestTransportErrorMapper, provider::ReqwestTampereProvider,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let access_token = env::var("TAMPERE_ACCESS_TOKEN")
		.map_err(|_| eyre!("Set TAMPERE_ACCESS_TOKEN to a Tampere SSO access token."))?;
	let target_app = env::var("TAMPERE_TARGET_APP").ok();
	let config = ProviderConfig::builder("demo-portal").user_agent("tampere-oauth2-demo").build()?;
	let provider = ReqwestTampereProvider::with_http_client(
		config,
		ReqwestHttpClient::default().with_timeout(Duration::from_secs(10)),
		ReqwestTransportErrorMapper,
	);

	match provider.fetch_user_profile(&access_token).await {
		Ok(profile) => println!(
			"Signed in as {} ({}).",
			profile.display_name.as_deref().unwrap_or("<unnamed>"),
			profile.primary_email().unwrap_or("no email")
		),
		Err(e) if e.kind() == ErrorKind::Transport =>
			eprintln!("The provider could not be reached or refused the token: {e}."),
		Err(e) => return Err(e.into()),
	}

	match provider.fetch_application_token(&access_token, target_app.as_deref()).await? {
		Some(token) => println!("Application token: {token}."),
		None => println!("The provider answered without a token."),
	}

	Ok(())
}
