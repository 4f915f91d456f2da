use std::{collections::BTreeSet, convert::Infallible, sync::Mutex};

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Duration, TimeZone, Utc};
use roost_core::{
  guard::require_role,
  principal::{NewPrincipal, Principal, PrincipalId, Registration},
  role::{LANDLORD, LODGER, Role, RoleName, RoleReplace},
  store::{CredentialStore, RoleStore},
};
use uuid::Uuid;

use crate::*;

const SECRET: &[u8] = b"a-test-secret-of-reasonable-length";

fn t0() -> DateTime<Utc> { Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap() }

fn issuer() -> TokenIssuer {
  let key = SigningKey::new(Algorithm::HS256, SECRET.to_vec()).unwrap();
  TokenIssuer::new(key, "roost", "roost-api", Duration::hours(24)).unwrap()
}

fn roles(names: &[&str]) -> Vec<RoleName> { names.iter().map(|n| RoleName::from(*n)).collect() }

fn payload_json(token: &str) -> serde_json::Value {
  let payload = token.split('.').nth(1).unwrap();
  serde_json::from_slice(&URL_SAFE_NO_PAD.decode(payload).unwrap()).unwrap()
}

// ─── Issue / verify ──────────────────────────────────────────────────────────

#[test]
fn round_trip_until_expiry() {
  let issuer = issuer();
  let verifier = issuer.verifier();
  let d = Duration::seconds(600);
  let token = issuer
    .issue(&"p-1".into(), Some("alice"), &roles(&["Admin", "Lodger"]), t0(), d)
    .unwrap();

  for offset in [0, 1, 299, 599] {
    let claims = verifier.verify(&token, t0() + Duration::seconds(offset)).unwrap();
    assert_eq!(claims.subject.as_str(), "p-1");
    assert_eq!(claims.name.as_deref(), Some("alice"));
    assert_eq!(claims.roles, roles(&["Admin", "Lodger"]));
    assert_eq!(claims.issuer, "roost");
    assert_eq!(claims.audience, "roost-api");
    assert_eq!(claims.issued_at, t0());
    assert_eq!(claims.expires_at, t0() + d);
  }
  for offset in [600, 601, 86_400] {
    let err = verifier.verify(&token, t0() + Duration::seconds(offset)).unwrap_err();
    assert!(matches!(err, TokenError::TokenExpired), "offset {offset}: {err:?}");
  }
}

#[test]
fn issued_at_is_truncated_to_seconds() {
  let issuer = issuer();
  let at = t0() + Duration::milliseconds(750);
  let token = issuer.issue(&"p-1".into(), None, &[], at, Duration::seconds(1)).unwrap();
  let json = payload_json(&token);
  assert_eq!(json["iat"], t0().timestamp());
  assert_eq!(json["exp"], t0().timestamp() + 1);
}

#[test]
fn sub_second_issue_time_shortens_lifetime() {
  let issuer = issuer();
  let at = t0() + Duration::milliseconds(750);
  let token = issuer
    .issue(&"p-1".into(), None, &[], at, Duration::seconds(10))
    .unwrap();
  let verifier = issuer.verifier();

  assert!(verifier.verify(&token, t0() + Duration::milliseconds(9_999)).is_ok());
  let err = verifier
    .verify(&token, at + Duration::milliseconds(9_500))
    .unwrap_err();
  assert!(matches!(err, TokenError::TokenExpired));
}

#[test]
fn tampering_any_character_invalidates_signature() {
  let issuer = issuer();
  let verifier = issuer.verifier();
  let token = issuer
    .issue(&"p-1".into(), None, &roles(&["Lodger"]), t0(), Duration::hours(1))
    .unwrap();

  for (i, c) in token.char_indices() {
    if c == '.' {
      continue;
    }
    let replacement = if c == 'A' { 'B' } else { 'A' };
    let mut forged = token.clone();
    forged.replace_range(i..i + 1, &replacement.to_string());
    let err = verifier.verify(&forged, t0()).unwrap_err();
    assert!(matches!(err, TokenError::SignatureInvalid), "index {i}: {err:?}");
  }
}

#[test]
fn payload_forged_with_elevated_role_is_rejected() {
  let issuer = issuer();
  let token = issuer
    .issue(&"p-1".into(), None, &roles(&["Lodger"]), t0(), Duration::hours(1))
    .unwrap();
  let mut parts: Vec<String> = token.split('.').map(str::to_owned).collect();
  let mut json = payload_json(&token);
  json["role"] = serde_json::json!("Admin");
  parts[1] = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&json).unwrap());

  let err = issuer.verifier().verify(&parts.join("."), t0()).unwrap_err();
  assert!(matches!(err, TokenError::SignatureInvalid));
}

#[test]
fn unsigned_token_is_rejected() {
  let issuer = issuer();
  let token = issuer
    .issue(&"p-1".into(), None, &roles(&["Admin"]), t0(), Duration::hours(1))
    .unwrap();
  let payload = token.split('.').nth(1).unwrap();
  let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);

  let err = issuer
    .verifier()
    .verify(&format!("{header}.{payload}."), t0())
    .unwrap_err();
  assert!(matches!(err, TokenError::SignatureInvalid));
}

#[test]
fn wrong_segment_count_is_malformed() {
  let verifier = issuer().verifier();
  for token in ["", "abc", "a.b", "a.b.c.d"] {
    let err = verifier.verify(token, t0()).unwrap_err();
    assert!(matches!(err, TokenError::Malformed(_)), "{token:?}: {err:?}");
  }
}

#[test]
fn other_key_is_signature_invalid() {
  let token = issuer()
    .issue(&"p-1".into(), None, &[], t0(), Duration::hours(1))
    .unwrap();
  let other = SigningKey::new(Algorithm::HS256, b"another-secret".to_vec()).unwrap();
  let err = TokenVerifier::new(other, "roost", "roost-api")
    .verify(&token, t0())
    .unwrap_err();
  assert!(matches!(err, TokenError::SignatureInvalid));
}

#[test]
fn issuer_and_audience_must_match() {
  let token = issuer()
    .issue(&"p-1".into(), None, &[], t0(), Duration::hours(1))
    .unwrap();
  let key = || SigningKey::new(Algorithm::HS256, SECRET.to_vec()).unwrap();

  let err = TokenVerifier::new(key(), "elsewhere", "roost-api")
    .verify(&token, t0())
    .unwrap_err();
  assert!(matches!(err, TokenError::IssuerMismatch));

  let err = TokenVerifier::new(key(), "roost", "other-api")
    .verify(&token, t0())
    .unwrap_err();
  assert!(matches!(err, TokenError::AudienceMismatch));
}

#[test]
fn invalid_issue_requests() {
  let issuer = issuer();
  let err = issuer
    .issue(&PrincipalId::from(""), None, &[], t0(), Duration::hours(1))
    .unwrap_err();
  assert!(matches!(err, TokenError::InvalidInput(_)));

  for validity in [Duration::zero(), Duration::seconds(-5), Duration::milliseconds(900)] {
    let err = issuer
      .issue(&"p-1".into(), None, &[], t0(), validity)
      .unwrap_err();
    assert!(matches!(err, TokenError::InvalidInput(_)));
  }

  let key = SigningKey::new(Algorithm::HS256, SECRET.to_vec()).unwrap();
  assert!(TokenIssuer::new(key, "roost", "roost-api", Duration::zero()).is_err());
}

#[test]
fn role_claim_is_string_for_one_and_array_for_many() {
  let issuer = issuer();
  let one = issuer
    .issue(&"p-1".into(), None, &roles(&["Lodger"]), t0(), Duration::hours(1))
    .unwrap();
  assert_eq!(payload_json(&one)["role"], "Lodger");

  let many = issuer
    .issue(&"p-1".into(), None, &roles(&["Admin", "Lodger", "Admin"]), t0(), Duration::hours(1))
    .unwrap();
  assert_eq!(payload_json(&many)["role"], serde_json::json!(["Admin", "Lodger"]));

  let none = issuer.issue(&"p-1".into(), None, &[], t0(), Duration::hours(1)).unwrap();
  let json = payload_json(&none);
  assert!(json.get("role").is_none());
  assert!(json.get("unique_name").is_none());
  assert!(issuer.verifier().verify(&none, t0()).unwrap().roles.is_empty());
}

#[test]
fn larger_hmac_variants_round_trip() {
  for alg in [Algorithm::HS384, Algorithm::HS512] {
    let key = SigningKey::new(alg, SECRET.to_vec()).unwrap();
    let issuer = TokenIssuer::new(key, "roost", "roost-api", Duration::hours(1)).unwrap();
    let token = issuer
      .issue(&"p-1".into(), None, &roles(&["Landlord"]), t0(), Duration::hours(1))
      .unwrap();
    let claims = issuer.verifier().verify(&token, t0()).unwrap();
    assert!(claims.has_role(LANDLORD));

    let hs256 = SigningKey::new(Algorithm::HS256, SECRET.to_vec()).unwrap();
    let err = TokenVerifier::new(hs256, "roost", "roost-api")
      .verify(&token, t0())
      .unwrap_err();
    assert!(matches!(err, TokenError::SignatureInvalid));
  }
}

// ─── Interoperability ────────────────────────────────────────────────────────

#[test]
fn jsonwebtoken_accepts_issued_tokens() {
  let issuer = issuer();
  let now = Utc::now();
  let token = issuer
    .issue(&"p-9".into(), Some("bob"), &roles(&["Lodger"]), now, Duration::hours(1))
    .unwrap();

  let mut validation = jsonwebtoken::Validation::new(jsonwebtoken::Algorithm::HS256);
  validation.set_issuer(&["roost"]);
  validation.set_audience(&["roost-api"]);
  let decoded = jsonwebtoken::decode::<serde_json::Value>(
    &token,
    &jsonwebtoken::DecodingKey::from_secret(SECRET),
    &validation,
  )
  .unwrap();
  assert_eq!(decoded.claims["sub"], "p-9");
  assert_eq!(decoded.claims["unique_name"], "bob");
  assert_eq!(decoded.claims["role"], "Lodger");
}

#[test]
fn verifies_tokens_from_jsonwebtoken() {
  let now = Utc::now();
  let claims = serde_json::json!({
    "sub": "p-7",
    "role": ["Landlord", "Lodger"],
    "iss": "roost",
    "aud": "roost-api",
    "iat": now.timestamp(),
    "exp": now.timestamp() + 60,
  });
  let token = jsonwebtoken::encode(
    &jsonwebtoken::Header::new(jsonwebtoken::Algorithm::HS256),
    &claims,
    &jsonwebtoken::EncodingKey::from_secret(SECRET),
  )
  .unwrap();

  let verified = issuer().verifier().verify(&token, now).unwrap();
  assert_eq!(verified.subject.as_str(), "p-7");
  assert_eq!(verified.roles, roles(&["Landlord", "Lodger"]));
  assert!(verified.name.is_none());
}

// ─── Password grant ──────────────────────────────────────────────────────────

#[derive(Default)]
struct Accounts {
  rows: Mutex<Vec<(Principal, String)>>,
}

impl Accounts {
  fn with(username: &str, password: &str, role_names: &[&str]) -> Self {
    let principal = Principal {
      principal_id: PrincipalId::from(format!("id-{username}")),
      username:     username.to_owned(),
      email:        format!("{username}@example.com"),
      first_name:   "Test".into(),
      last_name:    "User".into(),
      phone:        None,
      roles:        roles(role_names).into_iter().collect::<BTreeSet<_>>(),
      created_at:   t0(),
    };
    Self {
      rows: Mutex::new(vec![(principal, password.to_owned())]),
    }
  }

  fn find(&self, f: impl Fn(&Principal) -> bool) -> Option<Principal> {
    let rows = self.rows.lock().unwrap();
    rows.iter().find(|(p, _)| f(p)).map(|(p, _)| p.clone())
  }
}

impl CredentialStore for Accounts {
  type Error = Infallible;

  async fn authenticate(&self, username: &str, password: &str) -> Result<Option<Principal>, Infallible> {
    let rows = self.rows.lock().unwrap();
    Ok(
      rows
        .iter()
        .find(|(p, pw)| p.username == username && pw == password)
        .map(|(p, _)| p.clone()),
    )
  }

  async fn register(
    &self,
    _input: NewPrincipal,
    _password: &str,
    roles: Vec<RoleName>,
  ) -> Result<Registration, Infallible> {
    Ok(Registration::MissingRoles(roles))
  }

  async fn get_principal(&self, id: &PrincipalId) -> Result<Option<Principal>, Infallible> {
    Ok(self.find(|p| &p.principal_id == id))
  }

  async fn find_by_username(&self, username: &str) -> Result<Option<Principal>, Infallible> {
    Ok(self.find(|p| p.username == username))
  }

  async fn list_principals(&self) -> Result<Vec<Principal>, Infallible> {
    Ok(self.rows.lock().unwrap().iter().map(|(p, _)| p.clone()).collect())
  }

  async fn change_password(&self, _id: &PrincipalId, _old: &str, _new: &str) -> Result<bool, Infallible> {
    Ok(false)
  }
}

impl RoleStore for Accounts {
  type Error = Infallible;

  async fn list_roles(&self) -> Result<Vec<Role>, Infallible> { Ok(Vec::new()) }

  async fn get_role(&self, _role_id: Uuid) -> Result<Option<Role>, Infallible> { Ok(None) }

  async fn role_exists(&self, _name: &str) -> Result<bool, Infallible> { Ok(true) }

  async fn missing_roles(&self, _names: &[RoleName]) -> Result<Vec<RoleName>, Infallible> {
    Ok(Vec::new())
  }

  async fn create_role(&self, _name: RoleName) -> Result<Option<Role>, Infallible> { Ok(None) }

  async fn delete_role(&self, _role_id: Uuid) -> Result<bool, Infallible> { Ok(false) }

  async fn load_roles(&self, principal: &PrincipalId) -> Result<Option<Vec<RoleName>>, Infallible> {
    Ok(
      self
        .find(|p| &p.principal_id == principal)
        .map(|p| p.roles.into_iter().collect()),
    )
  }

  async fn replace_roles(
    &self,
    _principal: &PrincipalId,
    _roles: Vec<RoleName>,
  ) -> Result<RoleReplace, Infallible> {
    Ok(RoleReplace::UnknownPrincipal)
  }
}

#[tokio::test]
async fn lodger_grant_passes_lodger_guard_only() {
  let store = Accounts::with("lodger1", "secret1", &[LODGER]);
  let issuer = issuer();

  let response = grant(&store, &store, &issuer, "lodger1", "secret1", t0())
    .await
    .unwrap();
  assert_eq!(response.token_type, "bearer");
  assert_eq!(response.expires_in, "86400");

  let claims = issuer.verifier().verify(&response.access_token, t0()).unwrap();
  assert_eq!(claims.subject.as_str(), "id-lodger1");
  assert_eq!(claims.name.as_deref(), Some("lodger1"));
  assert!(require_role(&claims, &[LODGER]).is_ok());
  assert!(require_role(&claims, &[LANDLORD]).is_err());
}

#[tokio::test]
async fn bad_username_and_bad_password_fail_identically() {
  let store = Accounts::with("lodger1", "secret1", &[LODGER]);
  let issuer = issuer();

  let unknown = grant(&store, &store, &issuer, "nobody", "secret1", t0())
    .await
    .unwrap_err();
  let wrong = grant(&store, &store, &issuer, "lodger1", "wrong", t0())
    .await
    .unwrap_err();

  assert!(matches!(unknown, GrantError::InvalidGrant));
  assert!(matches!(wrong, GrantError::InvalidGrant));
  assert_eq!(unknown.to_string(), wrong.to_string());
}

#[tokio::test]
async fn grant_aligns_lifetime_to_whole_seconds() {
  let store = Accounts::with("lodger1", "secret1", &[LODGER]);
  let issuer = issuer();
  let verifier = issuer.verifier();
  let now = t0() + Duration::milliseconds(750);

  let response = grant(&store, &store, &issuer, "lodger1", "secret1", now)
    .await
    .unwrap();
  assert_eq!(response.expires_in, "86400");

  let claims = verifier.verify(&response.access_token, now).unwrap();
  assert_eq!(claims.issued_at, t0());
  assert_eq!(claims.expires_at - claims.issued_at, issuer.validity());

  let last = t0() + issuer.validity() - Duration::milliseconds(1);
  assert!(verifier.verify(&response.access_token, last).is_ok());
  let err = verifier
    .verify(&response.access_token, t0() + issuer.validity())
    .unwrap_err();
  assert!(matches!(err, TokenError::TokenExpired));
}

#[test]
fn local_token_carries_principal_roles() {
  let store = Accounts::with("landlord1", "pw1234", &[LANDLORD]);
  let principal = store.find(|_| true).unwrap();
  let issuer = issuer();

  let response = local_access_token(&issuer, &principal, t0()).unwrap();
  let claims = issuer.verifier().verify(&response.access_token, t0()).unwrap();
  assert!(claims.has_role(LANDLORD));
  assert!(!claims.has_role(LODGER));
}
