//! Builds an adapter from host-style JSON options and prints the login redirect URL.

// crates.io
use color_eyre::Result;
// self
use tampere_oauth2::{config::ProviderOptions, provider::ReqwestTampereProvider};

const OPTIONS: &str = r#"{
	"clientID": "demo-portal",
	"clientSecret": "demo-secret",
	"callbackURL": "https://portal.example.com/auth/tampere/callback",
	"customHeaders": { "X-Portal": "demo" }
}"#;

fn main() -> Result<()> {
	color_eyre::install()?;

	let options = serde_json::from_str::<ProviderOptions>(OPTIONS)?;
	let provider = ReqwestTampereProvider::new(options.into_config()?);
	let url = provider.authorize_url(["profile", "email"], "demo-state");

	println!("Send your user to {url}.");
	println!("Tokens are exchanged at {}.", provider.token_url());

	Ok(())
}
