//! Matching update credentials against maintainer `auth:` lines.
//!
//! Two schemes are understood:
//!
//! - `BLAKE3-PW $<salt>$<digest>`: any password credential on the update
//!   that hashes to the digest
//! - `ED25519-KEY <hex public key>`: any signed-message credential made by
//!   the key whose content is exactly the submitted record text
//!
//! Unknown schemes and malformed lines never match.

use regauth_core::message;
use regauth_core::record::AUTH;
use regauth_core::{
    Action, CiString, Ed25519PublicKey, ObjectType, PasswordHash, PreparedUpdate, Record,
    PASSWORD_SCHEME,
};
use regauth_store::ObjectStore;

use super::AuthenticationFailed;

/// Scheme name for Ed25519 public keys in `auth:` lines.
pub const KEY_SCHEME: &str = "ED25519-KEY";

/// Whether the update's credentials satisfy at least one `auth:` line of
/// `maintainer`.
pub fn maintainer_authenticates(maintainer: &Record, update: &PreparedUpdate) -> bool {
    maintainer
        .values(AUTH)
        .any(|line| auth_line_matches(line, update))
}

fn auth_line_matches(line: &str, update: &PreparedUpdate) -> bool {
    let mut parts = line.split_whitespace();
    let (Some(scheme), Some(value), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };

    if scheme.eq_ignore_ascii_case(PASSWORD_SCHEME) {
        let Ok(hash) = value.parse::<PasswordHash>() else {
            return false;
        };
        update.credentials().passwords().any(|p| hash.verify(p))
    } else if scheme.eq_ignore_ascii_case(KEY_SCHEME) {
        let Ok(key) = Ed25519PublicKey::from_hex(value) else {
            return false;
        };
        let text = update.record().to_text();
        update
            .credentials()
            .signed_messages()
            .any(|signed| signed.covers(&text) && signed.verify(&key))
    } else {
        false
    }
}

/// Authenticate `update` against the maintainers named in `names`.
///
/// `target` and `attribute` only shape the failure message. A maintainer
/// being created may vouch for itself; otherwise maintainers come from
/// `objects` and missing ones are skipped.
pub async fn authenticate_by_maintainers(
    objects: &dyn ObjectStore,
    update: &PreparedUpdate,
    target: &Record,
    attribute: &str,
    names: &[CiString],
) -> Result<Vec<Record>, AuthenticationFailed> {
    let mut authenticated = Vec::new();

    for name in names {
        let maintainer = if is_self_reference(update, name) {
            Some(update.record().clone())
        } else {
            match objects.get_object(ObjectType::Mntner, name).await {
                Ok(found) => found,
                Err(e) => {
                    tracing::warn!(maintainer = %name, error = %e, "maintainer lookup failed");
                    None
                }
            }
        };

        match maintainer {
            Some(m) if maintainer_authenticates(&m, update) => authenticated.push(m),
            Some(_) => {}
            None => tracing::debug!(maintainer = %name, "referenced maintainer not found"),
        }
    }

    if authenticated.is_empty() {
        Err(AuthenticationFailed::single(message::authentication_failed(
            target, attribute, names,
        )))
    } else {
        Ok(authenticated)
    }
}

fn is_self_reference(update: &PreparedUpdate, name: &CiString) -> bool {
    update.action() == Action::Create
        && update.object_type() == ObjectType::Mntner
        && update.key() == name
}

#[cfg(test)]
mod tests {
    use super::*;
    use regauth_core::{Keypair, SignedMessageCredential};
    use regauth_store::MemoryStore;

    fn password_line(password: &str) -> String {
        format!("{} {}", PASSWORD_SCHEME, PasswordHash::new(password))
    }

    fn person() -> Record {
        Record::builder(ObjectType::Person, "JD1-TEST")
            .mnt_by("OWNER-MNT")
            .build()
    }

    #[test]
    fn test_password_line() {
        let mntner = Record::builder(ObjectType::Mntner, "OWNER-MNT")
            .auth(password_line("secret"))
            .build();

        let good = PreparedUpdate::builder(Action::Modify, person())
            .password("wrong")
            .password("secret")
            .build();
        let bad = PreparedUpdate::builder(Action::Modify, person())
            .password("wrong")
            .build();

        assert!(maintainer_authenticates(&mntner, &good));
        assert!(!maintainer_authenticates(&mntner, &bad));
    }

    #[test]
    fn test_key_line_requires_covering_signature() {
        let keypair = Keypair::from_seed(&[7u8; 32]);
        let mntner = Record::builder(ObjectType::Mntner, "OWNER-MNT")
            .auth(format!("{} {}", KEY_SCHEME, keypair.public_key().to_hex()))
            .build();
        let record = person();

        let signed = SignedMessageCredential::sign(&keypair, record.to_text());
        let good = PreparedUpdate::builder(Action::Modify, record.clone())
            .signed(signed)
            .build();
        assert!(maintainer_authenticates(&mntner, &good));

        let stale = SignedMessageCredential::sign(&keypair, "person: somebody else\n");
        let bad = PreparedUpdate::builder(Action::Modify, record.clone())
            .signed(stale)
            .build();
        assert!(!maintainer_authenticates(&mntner, &bad));

        let stranger = Keypair::from_seed(&[9u8; 32]);
        let forged = PreparedUpdate::builder(Action::Modify, record.clone())
            .signed(SignedMessageCredential::sign(&stranger, record.to_text()))
            .build();
        assert!(!maintainer_authenticates(&mntner, &forged));
    }

    #[test]
    fn test_malformed_lines_never_match() {
        let mntner = Record::builder(ObjectType::Mntner, "OWNER-MNT")
            .auth("BLAKE3-PW")
            .auth("BLAKE3-PW not-a-hash")
            .auth("MD5-PW $1$abc$def")
            .auth("ED25519-KEY zz")
            .build();
        let update = PreparedUpdate::builder(Action::Modify, person())
            .password("secret")
            .build();
        assert!(!maintainer_authenticates(&mntner, &update));
    }

    #[tokio::test]
    async fn test_by_maintainers_collects_matches() {
        let store = MemoryStore::new();
        let owner = Record::builder(ObjectType::Mntner, "OWNER-MNT")
            .auth(password_line("secret"))
            .build();
        let other = Record::builder(ObjectType::Mntner, "OTHER-MNT")
            .auth(password_line("different"))
            .build();
        store.put_object(&owner).await.unwrap();
        store.put_object(&other).await.unwrap();

        let record = person();
        let update = PreparedUpdate::builder(Action::Modify, record.clone())
            .password("secret")
            .build();
        let names = vec![
            CiString::from("OWNER-MNT"),
            CiString::from("OTHER-MNT"),
            CiString::from("MISSING-MNT"),
        ];

        let found = authenticate_by_maintainers(&store, &update, &record, "mnt-by", &names)
            .await
            .unwrap();
        assert_eq!(found, vec![owner]);
    }

    #[tokio::test]
    async fn test_by_maintainers_failure_names_candidates() {
        let store = MemoryStore::new();
        let record = person();
        let update = PreparedUpdate::builder(Action::Modify, record.clone()).build();
        let names = vec![CiString::from("OWNER-MNT")];

        let failed = authenticate_by_maintainers(&store, &update, &record, "mnt-by", &names)
            .await
            .unwrap_err();
        assert_eq!(failed.messages().len(), 1);
        assert!(failed.messages()[0].text.contains("OWNER-MNT"));
        assert!(failed.messages()[0].text.contains("mnt-by"));
    }

    #[tokio::test]
    async fn test_new_maintainer_vouches_for_itself() {
        let store = MemoryStore::new();
        let record = Record::builder(ObjectType::Mntner, "NEW-MNT")
            .auth(password_line("fresh"))
            .mnt_by("NEW-MNT")
            .build();
        let names = record.maintainers();

        let create = PreparedUpdate::builder(Action::Create, record.clone())
            .password("fresh")
            .build();
        let found = authenticate_by_maintainers(&store, &create, &record, "mnt-by", &names)
            .await
            .unwrap();
        assert_eq!(found, vec![record.clone()]);

        // A modify must be authorised by the stored version.
        let modify = PreparedUpdate::builder(Action::Modify, record.clone())
            .password("fresh")
            .build();
        assert!(
            authenticate_by_maintainers(&store, &modify, &record, "mnt-by", &names)
                .await
                .is_err()
        );
    }
}
