#![cfg(feature = "reqwest")]

// crates.io
use httpmock::prelude::*;
// self
use tampere_oauth2::{
	_preludet::*,
	auth::TokenGrant,
	config::ProviderConfig,
	error::{ErrorKind, TokenExchangeError},
	profile::NormalizedProfile,
	provider::ReqwestTampereProvider,
	strategy::TampereStrategy,
};

const CLIENT_ID: &str = "client-it";
const CLIENT_SECRET: &str = "secret-it";

#[derive(Debug)]
struct UnknownUser;
impl Display for UnknownUser {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "User is not registered with the portal.")
	}
}
impl StdError for UnknownUser {}

#[derive(Debug, PartialEq, Eq)]
struct PortalUser {
	id: String,
	access_token: String,
	email: Option<String>,
}

fn build_provider(server: &MockServer) -> ReqwestTampereProvider {
	let config = ProviderConfig::builder(CLIENT_ID)
		.client_secret(CLIENT_SECRET)
		.callback_url(
			Url::parse("https://portal.example.com/auth/tampere/callback")
				.expect("Callback URL should parse."),
		)
		.authorization_url(
			Url::parse(&server.url("/oauth2/authorize/"))
				.expect("Mock authorization endpoint should parse."),
		)
		.token_url(
			Url::parse(&server.url("/oauth2/token/")).expect("Mock token endpoint should parse."),
		)
		.user_profile_url(
			Url::parse(&server.url("/user/")).expect("Mock profile endpoint should parse."),
		)
		.build()
		.expect("Mock configuration should build.");

	build_reqwest_test_provider(config)
}

async fn portal_user(
	grant: TokenGrant,
	profile: NormalizedProfile,
) -> Result<PortalUser, UnknownUser> {
	let id = profile.id.clone().ok_or(UnknownUser)?;

	Ok(PortalUser {
		id,
		access_token: grant.access_token.expose().to_owned(),
		email: profile.primary_email().map(str::to_owned),
	})
}

#[tokio::test]
async fn authenticate_runs_exchange_profile_and_verify() {
	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/oauth2/token/")
				.header("content-type", "application/x-www-form-urlencoded");
			then.status(200).header("content-type", "application/json").body(
				r#"{"access_token":"access-it","token_type":"bearer","expires_in":3600,"refresh_token":"refresh-it"}"#,
			);
		})
		.await;
	let profile_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/user/").header("authorization", "Bearer access-it");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"uuid":"u-7","username":"u-abc","email":"matti@example.fi"}"#);
		})
		.await;
	let strategy = TampereStrategy::new(build_provider(&server), portal_user);

	assert_eq!(strategy.name(), "tampere");

	let user = strategy.authenticate("code-it").await.expect("Login should succeed.");

	token_mock.assert_async().await;
	profile_mock.assert_async().await;

	assert_eq!(
		user,
		PortalUser {
			id: "u-7".into(),
			access_token: "access-it".into(),
			email: Some("matti@example.fi".into()),
		}
	);
}

#[tokio::test]
async fn verify_failures_are_reported_as_such() {
	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth2/token/");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"access_token":"access-it","token_type":"bearer"}"#);
		})
		.await;
	let profile_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/user/");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"username":"anon"}"#);
		})
		.await;
	let strategy = TampereStrategy::new(build_provider(&server), portal_user);
	let err = strategy
		.authenticate("code-it")
		.await
		.expect_err("Profiles without an id must be refused.");

	token_mock.assert_async().await;
	profile_mock.assert_async().await;

	assert_eq!(err.kind(), ErrorKind::Verify);
	assert!(matches!(err, Error::Verify { .. }));
}

#[tokio::test]
async fn rejected_codes_skip_the_profile_fetch() {
	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth2/token/");
			then.status(400)
				.header("content-type", "application/json")
				.body(r#"{"error":"invalid_grant","error_description":"Code expired."}"#);
		})
		.await;
	let profile_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/user/");
			then.status(200).header("content-type", "application/json").body("{}");
		})
		.await;
	let strategy = TampereStrategy::new(build_provider(&server), portal_user);
	let err = strategy.authenticate("stale-code").await.expect_err("Expired codes must fail.");

	token_mock.assert_async().await;
	profile_mock.assert_calls_async(0).await;

	assert_eq!(err.kind(), ErrorKind::Rejected);
	assert!(matches!(
		err,
		Error::TokenExchange(TokenExchangeError::Rejected { ref error, ref description })
			if error == "invalid_grant" && description.as_deref() == Some("Code expired.")
	));
}

#[tokio::test]
async fn authorize_url_points_at_the_configured_endpoint() {
	let server = MockServer::start_async().await;
	let strategy = TampereStrategy::new(build_provider(&server), portal_user);
	let url = strategy.authorize_url(["profile", "email"], "state-it");
	let pairs = url.query_pairs().into_owned().collect::<Vec<_>>();

	assert_eq!(url.path(), "/oauth2/authorize/");
	assert!(pairs.contains(&("client_id".into(), CLIENT_ID.into())));
	assert!(pairs.contains(&("state".into(), "state-it".into())));
	assert!(pairs.contains(&("scope".into(), "profile,email".into())));
	assert!(pairs.contains(&(
		"redirect_uri".into(),
		"https://portal.example.com/auth/tampere/callback".into()
	)));
}
